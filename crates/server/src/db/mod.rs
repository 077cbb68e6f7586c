//! Database operations for the Trove `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Site authentication and profile data
//! - `products` - Marketplace listings
//! - `cart_items` - Per-user shopping carts
//! - `purchases` - Immutable order history
//! - `tower_sessions` - Session storage (created by the session store itself)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p trove-cli -- migrate
//! ```

pub mod carts;
pub mod products;
pub mod purchases;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use carts::CartRepository;
pub use products::ProductRepository;
pub use purchases::PurchaseRepository;
pub use users::UserRepository;

/// Embedded migrations, shared with the CLI `migrate` command.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist. WAL mode keeps
/// readers from blocking the writer.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection fails.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a migrated in-memory pool for repository and service tests.
///
/// A single connection is required: each connection to `sqlite::memory:`
/// would otherwise see its own empty database.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options =
        SqliteConnectOptions::from_str("sqlite::memory:").expect("valid connection string");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database");

    MIGRATOR.run(&pool).await.expect("migrations apply");
    pool
}
