//! Purchase history domain types.

use chrono::{DateTime, Utc};

use trove_core::{Price, PurchaseId};

use crate::models::product::Product;

/// A completed purchase joined with its listing.
///
/// `price_paid` is the price copied at checkout time; the listing's current
/// price may have changed since.
#[derive(Debug, Clone)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub product: Product,
    pub seller_username: String,
    pub price_paid: Price,
    pub purchased_at: DateTime<Utc>,
}
