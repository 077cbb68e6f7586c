//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::TroveConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "trove_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer around an `SQLite` store.
///
/// The store's `migrate()` must have been run before serving requests;
/// the caller does that while it still has the store by value.
///
/// # Arguments
///
/// * `store` - `SQLite` session store
/// * `config` - Server configuration (for the cookie security flag)
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &TroveConfig,
) -> SessionManagerLayer<SqliteStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
