//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! trove migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TROVE_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://trove.db`)
//!
//! The server never migrates on startup; this command is the one place
//! migrations are applied outside of tests.

use thiserror::Error;

use trove_server::config::{ConfigError, TroveConfig};
use trove_server::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply the embedded migrations to the configured database.
///
/// The database file is created if it does not exist. Already-applied
/// migrations are skipped, so running this repeatedly is safe.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = TroveConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
