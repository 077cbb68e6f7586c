//! Home route handler.

use axum::response::{IntoResponse, Redirect};

use crate::middleware::OptionalAuth;

/// Send logged-in visitors to the listings and everyone else to login.
pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    if user.is_some() {
        Redirect::to("/products")
    } else {
        Redirect::to("/auth/login")
    }
}
