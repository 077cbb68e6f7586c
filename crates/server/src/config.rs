//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TROVE_DATABASE_URL` - `SQLite` connection string (default: sqlite://trove.db,
//!   falls back to generic `DATABASE_URL` before the default)
//! - `TROVE_HOST` - Bind address (default: 127.0.0.1)
//! - `TROVE_PORT` - Listen port (default: 9000)
//! - `TROVE_BASE_URL` - Public URL for the site (default: <http://localhost:9000>)
//! - `TROVE_UPLOAD_DIR` - Directory for uploaded listing images (default: public/uploads)
//! - `TROVE_STATIC_DIR` - Directory for bundled static assets (default: crates/server/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., production)
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Trove application configuration.
#[derive(Debug, Clone)]
pub struct TroveConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Directory where uploaded listing images are stored
    pub upload_dir: PathBuf,
    /// Directory holding bundled static assets (CSS, placeholder image)
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl TroveConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TROVE_DATABASE_URL");
        let host = get_env_or_default("TROVE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TROVE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TROVE_PORT", "9000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TROVE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("TROVE_BASE_URL", "http://localhost:9000");
        let upload_dir = PathBuf::from(get_env_or_default("TROVE_UPLOAD_DIR", "public/uploads"));
        let static_dir =
            PathBuf::from(get_env_or_default("TROVE_STATIC_DIR", "crates/server/static"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            upload_dir,
            static_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`, then a local
/// file default so `cargo run` works out of the box.
fn get_database_url(primary_key: &str) -> SecretString {
    // Try primary key first (e.g., TROVE_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return SecretString::from(value);
    }
    // Fallback to generic DATABASE_URL
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from("sqlite://trove.db")
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

    fn test_config() -> TroveConfig {
        TroveConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 9000,
            base_url: "http://localhost:9000".to_string(),
            upload_dir: PathBuf::from("public/uploads"),
            static_dir: PathBuf::from("crates/server/static"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("TROVE_PORT".to_string());
        assert_eq!(err.to_string(), "Missing environment variable: TROVE_PORT");

        let err = ConfigError::InvalidEnvVar("TROVE_PORT".to_string(), "bad".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment variable TROVE_PORT: bad"
        );
    }
}
