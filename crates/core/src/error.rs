use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to {operation}: timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    #[error("sequence counter '{0}' returned no value")]
    SequenceUnavailable(String),
}

impl PatientError {
    /// Returns a closure tagging a driver error with the operation that produced it.
    ///
    /// Intended for `map_err`, e.g. `.map_err(PatientError::database("find patient"))`.
    pub fn database(operation: &'static str) -> impl FnOnce(mongodb::error::Error) -> Self {
        move |source| PatientError::Database { operation, source }
    }

    /// True for failures caused by the caller's data rather than the backing store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PatientError::InvalidInput(_))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
