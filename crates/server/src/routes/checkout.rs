//! Checkout and purchase history routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::purchase::PurchaseRecord;
use crate::routes::{MessageQuery, redirect_error, redirect_success, short_date};
use crate::services::checkout::{CheckoutError, CheckoutService};
use crate::state::AppState;

// ============================================================================
// View models
// ============================================================================

/// One purchase as rendered in the history list.
pub struct PurchaseView {
    pub product_id: i64,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price_paid: String,
    pub seller: String,
    pub purchased_on: String,
}

impl From<&PurchaseRecord> for PurchaseView {
    fn from(record: &PurchaseRecord) -> Self {
        Self {
            product_id: record.product.id.as_i64(),
            title: record.product.title.clone(),
            category: record.product.category.label().to_string(),
            image: record.product.primary_image().to_string(),
            price_paid: record.price_paid.to_string(),
            seller: record.seller_username.clone(),
            purchased_on: short_date(&record.purchased_at),
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "account/purchases.html")]
pub struct PurchasesTemplate {
    pub purchases: Vec<PurchaseView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// ============================================================================
// Route handlers
// ============================================================================

/// Handle POST /checkout - buy everything in the cart.
#[instrument(skip(state, user))]
pub async fn checkout(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Response {
    match CheckoutService::new(state.pool()).purchase(user.id).await {
        Ok(count) => {
            add_breadcrumb(
                "checkout",
                "Completed purchase",
                Some(&[("purchases", &count.to_string())]),
            );
            redirect_success("/purchases", "Purchase completed successfully!").into_response()
        }
        Err(CheckoutError::EmptyCart) => redirect_error("/cart", "Cart is empty").into_response(),
        Err(e) => {
            tracing::error!("Checkout failed for {}: {e}", user.id);
            redirect_error("/cart", "Error processing purchase").into_response()
        }
    }
}

/// Handle GET /purchases - previously bought items, most recent first.
pub async fn purchases(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (history, error) = match CheckoutService::new(state.pool()).history(user.id).await {
        Ok(history) => (history, query.error),
        Err(e) => {
            tracing::error!("Failed to load purchases for {}: {e}", user.id);
            (Vec::new(), Some("Error loading purchases".to_string()))
        }
    };

    PurchasesTemplate {
        purchases: history.iter().map(PurchaseView::from).collect(),
        error,
        success: query.success,
    }
}
