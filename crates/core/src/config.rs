//! Store configuration.
//!
//! Configuration is resolved once at process startup and passed into the persistence service.
//! Nothing in this crate reads environment variables while handling a request; the helpers here
//! accept already-read `Option<String>` values so the binary decides where they come from.

use crate::constants::{
    DEFAULT_COUNTERS_COLLECTION, DEFAULT_DATABASE, DEFAULT_PATIENTS_COLLECTION,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::{PatientError, PatientResult};
use std::time::Duration;

const DEFAULT_HOST: &str = "mongo_db";
const DEFAULT_PORT: &str = "27017";
const DEFAULT_USERNAME: &str = "root";
const DEFAULT_PASSWORD: &str = "example";

/// Connection and layout settings for the document store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    uri: String,
    database: String,
    patients_collection: String,
    counters_collection: String,
    timeout: Duration,
}

impl StoreConfig {
    /// Create a new `StoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidConfig`] if any name is blank or the timeout is zero.
    pub fn new(
        uri: String,
        database: String,
        patients_collection: String,
        counters_collection: String,
        timeout: Duration,
    ) -> PatientResult<Self> {
        for (label, value) in [
            ("connection uri", &uri),
            ("database name", &database),
            ("patients collection", &patients_collection),
            ("counters collection", &counters_collection),
        ] {
            if value.trim().is_empty() {
                return Err(PatientError::InvalidConfig(format!("{label} cannot be empty")));
            }
        }

        if patients_collection == counters_collection {
            return Err(PatientError::InvalidConfig(
                "patients and counters must use different collections".into(),
            ));
        }

        if timeout.is_zero() {
            return Err(PatientError::InvalidConfig(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            uri,
            database,
            patients_collection,
            counters_collection,
            timeout,
        })
    }

    /// Builds a configuration with default names for everything except the URI.
    pub fn with_uri(uri: String) -> PatientResult<Self> {
        Self::new(
            uri,
            DEFAULT_DATABASE.into(),
            DEFAULT_PATIENTS_COLLECTION.into(),
            DEFAULT_COUNTERS_COLLECTION.into(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn patients_collection(&self) -> &str {
        &self.patients_collection
    }

    pub fn counters_collection(&self) -> &str {
        &self.counters_collection
    }

    /// Upper bound for any single persistence operation, including connection setup.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Credential parts used when no full connection URI is configured.
#[derive(Clone, Debug, Default)]
pub struct MongoUriParts {
    pub host: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the connection URI from an explicit value or from credential parts.
///
/// An explicit, non-blank `uri` wins. Otherwise the URI is assembled as
/// `mongodb://<username>:<password>@<host>:<port>` with defaults for every missing part.
pub fn mongodb_uri_from_env_values(uri: Option<String>, parts: MongoUriParts) -> String {
    if let Some(uri) = non_blank(uri) {
        return uri;
    }

    let username = non_blank(parts.username).unwrap_or_else(|| DEFAULT_USERNAME.into());
    let password = non_blank(parts.password).unwrap_or_else(|| DEFAULT_PASSWORD.into());
    let host = non_blank(parts.host).unwrap_or_else(|| DEFAULT_HOST.into());
    let port = non_blank(parts.port).unwrap_or_else(|| DEFAULT_PORT.into());

    format!("mongodb://{username}:{password}@{host}:{port}")
}

/// Parse the operation timeout in whole seconds.
///
/// If `value` is `None` or blank, returns the default of ten seconds.
pub fn timeout_from_env_value(value: Option<String>) -> PatientResult<Duration> {
    match non_blank(value) {
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| PatientError::InvalidConfig(format!("invalid timeout seconds: '{v}'"))),
    }
}

/// Return `value` unless it is missing or blank, in which case return `default`.
pub fn name_from_env_value(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}
