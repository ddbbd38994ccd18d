//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults produce a working local
//! instance backed by `donelist.db` in the working directory.
//!
//! - `DATABASE_URL` - SQLite database URL (default: `sqlite://donelist.db`)
//! - `DONELIST_HOST` - Server bind address (default: 127.0.0.1)
//! - `DONELIST_PORT` - Server port (default: 3000)
//! - `DONELIST_BASE_URL` - Public base URL, controls the Secure cookie
//!   flag (default: `http://localhost:3000`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database URL.
    pub database_url: String,

    /// Host address to bind to.
    pub host: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Public base URL of the application.
    pub base_url: String,

    /// Sentry DSN for error tracking (optional).
    pub sentry_dsn: Option<String>,

    /// Sentry environment name (optional).
    pub sentry_environment: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists (development convenience)
        let _ = dotenvy::dotenv();

        let database_url = get_env_or_default("DATABASE_URL", "sqlite://donelist.db");

        let host = get_env_or_default("DONELIST_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DONELIST_HOST".to_string(), e.to_string()))?;

        let port = get_env_or_default("DONELIST_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DONELIST_PORT".to_string(), e.to_string()))?;

        let base_url = get_env_or_default("DONELIST_BASE_URL", "http://localhost:3000");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_get_env_or_default_returns_default_when_unset() {
        let value = get_env_or_default("DONELIST_TEST_VAR_THAT_DOES_NOT_EXIST", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_optional_env_returns_none_when_unset() {
        assert!(get_optional_env("DONELIST_TEST_VAR_THAT_DOES_NOT_EXIST").is_none());
    }
}
