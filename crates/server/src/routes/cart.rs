//! Shopping cart routes: view, update quantities, remove entries.
//!
//! Quantity changes and removals are plain form posts. A quantity that
//! doesn't parse as a number falls back to one, matching what the number
//! input allows in the browser.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::instrument;

use trove_core::ProductId;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::cart::CartEntry;
use crate::routes::{MessageQuery, redirect_error, redirect_success};
use crate::services::cart::CartService;
use crate::state::AppState;

// ============================================================================
// View models
// ============================================================================

/// One cart line as rendered on the cart page.
pub struct CartLineView {
    pub product_id: i64,
    pub title: String,
    pub price: String,
    pub quantity: i64,
    pub line_total: String,
    pub image: String,
    pub seller: String,
}

impl From<&CartEntry> for CartLineView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.as_i64(),
            title: entry.product.title.clone(),
            price: entry.product.price.to_string(),
            quantity: entry.quantity,
            line_total: entry.line_total().to_string(),
            image: entry.product.primary_image().to_string(),
            seller: entry.seller_username.clone(),
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

// ============================================================================
// Forms
// ============================================================================

/// Quantity change for one cart entry.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    /// Raw quantity text; anything unparseable falls back to one.
    pub quantity: String,
}

/// Removal of one cart entry.
#[derive(Debug, Deserialize)]
pub struct RemoveCartForm {
    pub product_id: i64,
}

// ============================================================================
// Route handlers
// ============================================================================

/// Handle GET /cart - the cart page with line and grand totals.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    match CartService::new(state.pool()).view(user.id).await {
        Ok(view) => CartTemplate {
            lines: view.entries.iter().map(CartLineView::from).collect(),
            total: view.total.to_string(),
            error: query.error,
            success: query.success,
        },
        Err(e) => {
            tracing::error!("Failed to load cart for {}: {e}", user.id);
            CartTemplate {
                lines: Vec::new(),
                total: "0".to_string(),
                error: Some("Error loading cart".to_string()),
                success: None,
            }
        }
    }
}

/// Handle POST /cart/update - change the quantity of one entry.
#[instrument(skip(state, user))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let quantity = form.quantity.trim().parse::<i64>().unwrap_or(1);
    let product_id = ProductId::new(form.product_id);

    match CartService::new(state.pool())
        .set_quantity(user.id, product_id, quantity)
        .await
    {
        // No notice when the entry wasn't there to update
        Ok(true) => redirect_success("/cart", "Cart updated").into_response(),
        Ok(false) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to update cart for {}: {e}", user.id);
            redirect_error("/cart", "Error updating cart").into_response()
        }
    }
}

/// Handle POST /cart/remove - drop one entry from the cart.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<RemoveCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);

    match CartService::new(state.pool())
        .remove(user.id, product_id)
        .await
    {
        Ok(()) => redirect_success("/cart", "Product removed from cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to remove cart entry for {}: {e}", user.id);
            redirect_error("/cart", "Error removing product from cart").into_response()
        }
    }
}
