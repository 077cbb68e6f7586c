//! HTTP middleware stack for the marketplace server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `SQLite` store)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireGuest, clear_current_user, set_current_user,
};
pub use session::create_session_layer;
