//! Cart domain types.

use chrono::{DateTime, Utc};

use trove_core::Price;

use crate::models::product::Product;

/// One cart row joined with its listing.
///
/// Rows whose product has been deleted are dropped by the join and never
/// reach this type.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub product: Product,
    pub seller_username: String,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    /// Line total for this entry (price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A user's cart with its grand total.
#[derive(Debug, Clone)]
pub struct CartView {
    pub entries: Vec<CartEntry>,
    pub total: Price,
}

impl CartView {
    /// True when the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
