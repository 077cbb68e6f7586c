//! HTTP route handlers for the marketplace.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to listings (login page for guests)
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /auth/login             - Login page (guests only)
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page (guests only)
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Listings
//! GET  /products               - Browse listings (?search=&category=&sort=)
//! POST /products               - Create listing (multipart)
//! GET  /products/new           - New listing form
//! GET  /products/my/listings   - The seller's own listings
//! GET  /products/{id}          - Listing detail (counts the view)
//! POST /products/{id}          - Update listing (multipart)
//! GET  /products/{id}/edit     - Edit form
//! POST /products/{id}/delete   - Delete listing
//! POST /products/{id}/cart     - Add listing to cart
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/update            - Change quantity (product_id + quantity)
//! POST /cart/remove            - Remove entry (product_id)
//!
//! # Checkout
//! POST /checkout               - Purchase the entire cart
//! GET  /purchases              - Purchase history
//!
//! # Account
//! GET  /dashboard              - Profile page
//! POST /profile                - Profile update
//! ```
//!
//! Handlers follow one boundary rule: failures become a redirect to a
//! sensible prior page carrying a `?error=` notice, successes a
//! `?success=` notice. Nothing user-triggered surfaces as a bare error
//! response.

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::state::AppState;

/// Body cap for multipart listing submissions: five images at 5 MB plus
/// form text, with headroom for multipart framing.
const UPLOAD_BODY_LIMIT: usize = 30 * 1024 * 1024;

/// Query parameters for error/success notice display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect carrying a user-visible error notice in the query string.
pub(crate) fn redirect_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect carrying a user-visible success notice in the query string.
pub(crate) fn redirect_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Short date form used across listing and purchase views.
pub(crate) fn short_date(when: &DateTime<Utc>) -> String {
    when.format("%b %e, %Y").to_string()
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the listing routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_listing_page))
        .route("/my/listings", get(products::my_listings))
        .route("/{id}", get(products::show).post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/delete", post(products::delete))
        .route("/{id}/cart", post(products::add_to_cart))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the marketplace.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home redirect
        .route("/", get(home::home))
        // Listing routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout and purchase history
        .route("/checkout", post(checkout::checkout))
        .route("/purchases", get(checkout::purchases))
        // Account routes
        .route("/dashboard", get(account::dashboard))
        .route("/profile", post(account::update_profile))
        // Auth routes
        .nest("/auth", auth_routes())
}
