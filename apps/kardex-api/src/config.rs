//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the
//! application exits with a clear error message.

use std::env;
use thiserror::Error;

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Invitation provider settings.
///
/// Present only when `INVITE_URL` is configured; the server falls back to
/// a log-only sender otherwise.
#[derive(Debug, Clone)]
pub struct InviteConfig {
    /// Invitation endpoint of the auth provider.
    pub url: String,

    /// Bearer token for the invitation endpoint.
    pub token: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Tracing filter directive (e.g., "info,kardex=debug")
    pub rust_log: String,

    /// Server bind address
    pub host: String,

    /// Server listen port
    pub port: u16,

    /// Invitation provider (optional)
    pub invite: Option<InviteConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// are invalid (e.g., invalid port number).
    ///
    /// # Required Variables
    ///
    /// - `DATABASE_URL` - PostgreSQL connection string
    ///
    /// # Optional Variables
    ///
    /// - `RUST_LOG` - Log level filter (default: "info")
    /// - `HOST` - Bind address (default: "0.0.0.0")
    /// - `PORT` - Listen port (default: 8080)
    /// - `INVITE_URL` - Invitation endpoint; enables real dispatch
    /// - `INVITE_TOKEN` - Bearer token, required when `INVITE_URL` is set
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development only)
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        let invite = match env::var("INVITE_URL") {
            Ok(url) if !url.is_empty() => {
                let token = env::var("INVITE_TOKEN")
                    .map_err(|_| ConfigError::MissingVar("INVITE_TOKEN".to_string()))?;
                if token.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        var: "INVITE_TOKEN".to_string(),
                        message: "Must not be empty when INVITE_URL is set".to_string(),
                    });
                }
                Some(InviteConfig { url, token })
            }
            _ => None,
        };

        Ok(Config {
            database_url,
            rust_log,
            host,
            port,
            invite,
        })
    }

    /// Get the server bind address as a socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/kardex".to_string(),
            rust_log: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            invite: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: TEST_VAR"
        );

        let err = ConfigError::InvalidValue {
            var: "PORT".to_string(),
            message: "Must be a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for PORT: Must be a number");
    }

    #[test]
    fn test_bind_addr() {
        let config = test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
