//! Repository-related utilities.
//!
//! Deadline enforcement and driver error classification shared by the MongoDB repositories.

use crate::constants::DUPLICATE_KEY_CODE;
use crate::{PatientError, PatientResult};
use mongodb::error::{Error, ErrorKind, WriteFailure};
use std::future::Future;
use std::time::Duration;

/// Runs `fut` to completion or fails with [`PatientError::Timeout`] once `timeout` elapses.
///
/// On expiry the inner future is dropped, which abandons any in-flight driver call.
pub(crate) async fn with_deadline<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> PatientResult<T>
where
    F: Future<Output = PatientResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?timeout, "persistence operation timed out");
            Err(PatientError::Timeout { operation, timeout })
        }
    }
}

/// True when the server rejected a write because of a unique index violation.
///
/// `findAndModify` reports this as a command error, plain writes as a write error.
pub(crate) fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}
