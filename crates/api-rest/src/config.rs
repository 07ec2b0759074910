//! HTTP server configuration.
//!
//! Like the store configuration in `ambulance-core`, these values are resolved once at startup
//! from already-read environment values.

use std::net::{Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid port: '{0}'")]
    InvalidPort(String),
    #[error("base path must start with '/', got: '{0}'")]
    InvalidBasePath(String),
}

/// Deployment environment, selecting the default log verbosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `production` in any letter case selects [`Environment::Production`]; anything else,
    /// including no value, is development.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Default level for this workspace's log targets.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Production => "info",
            Environment::Development => "debug",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    port: u16,
    base_path: String,
    environment: Environment,
}

impl ServerConfig {
    /// Create a new `ServerConfig` from raw environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the port is not a valid TCP port or the base path does not
    /// start with `/`.
    pub fn from_env_values(
        port: Option<String>,
        base_path: Option<String>,
        environment: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            port: port_from_env_value(port)?,
            base_path: base_path_from_env_value(base_path)?,
            environment: Environment::from_env_value(environment),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Route prefix, either empty or starting with `/` and without a trailing `/`.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn port_from_env_value(value: Option<String>) -> Result<u16, ConfigError> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidPort(v)),
    }
}

fn base_path_from_env_value(value: Option<String>) -> Result<String, ConfigError> {
    let value = value.unwrap_or_default();
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidBasePath(value));
    }
    Ok(trimmed.to_string())
}
