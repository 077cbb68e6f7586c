//! Turning a cart into purchase history.

use sqlx::SqlitePool;
use thiserror::Error;

use trove_core::UserId;

use crate::db::{CartRepository, ProductRepository, PurchaseRepository, RepositoryError};
use crate::models::purchase::PurchaseRecord;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with an empty cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// Database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service for checkout and purchase history.
pub struct CheckoutService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
    purchases: PurchaseRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
            purchases: PurchaseRepository::new(pool),
        }
    }

    /// Buy everything in the user's cart.
    ///
    /// Each cart entry becomes one purchase at the listing's current price,
    /// the listing is marked sold, and the cart is emptied. Returns the
    /// number of purchases made.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to buy.
    /// Returns `CheckoutError::Repository` if a database operation fails.
    pub async fn purchase(&self, user: UserId) -> Result<usize, CheckoutError> {
        let entries = self.carts.entries(user).await?;
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let count = entries.len();
        for entry in entries {
            self.purchases
                .record(user, entry.product.id, entry.product.price)
                .await?;

            // The listing can vanish between reading the cart and here;
            // the purchase row stands either way
            match self.products.mark_sold(entry.product.id).await {
                Ok(()) | Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.carts.clear(user).await?;
        Ok(count)
    }

    /// The user's purchase history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn history(&self, user: UserId) -> Result<Vec<PurchaseRecord>, CheckoutError> {
        Ok(self.purchases.history(user).await?)
    }
}
