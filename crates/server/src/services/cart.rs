//! Cart contents and the rules for adding to them.

use sqlx::SqlitePool;
use thiserror::Error;

use trove_core::{Price, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::cart::CartView;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The listing doesn't exist.
    #[error("listing not found")]
    ProductNotFound,

    /// A seller tried to add their own listing.
    #[error("you cannot add your own listing to your cart")]
    OwnListing,

    /// The listing is already in the cart.
    #[error("listing is already in your cart")]
    AlreadyInCart,

    /// Database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service for a user's shopping cart.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add a listing to the user's cart. Quantities below one are bumped
    /// up to one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the listing doesn't exist.
    /// Returns `CartError::OwnListing` if the user is the seller.
    /// Returns `CartError::AlreadyInCart` if the listing is already there.
    pub async fn add(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if product.seller_id == user {
            return Err(CartError::OwnListing);
        }

        match self.carts.add(user, product_id, quantity.max(1)).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::Conflict(_)) => Err(CartError::AlreadyInCart),
            Err(e) => Err(e.into()),
        }
    }

    /// The user's cart with per-line and grand totals.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn view(&self, user: UserId) -> Result<CartView, CartError> {
        let entries = self.carts.entries(user).await?;
        let total = entries
            .iter()
            .fold(Price::ZERO, |sum, entry| sum.plus(entry.line_total()));

        Ok(CartView { entries, total })
    }

    /// Change the quantity of a cart entry. Quantities below one are bumped
    /// up to one; a listing that isn't in the cart is left alone. Returns
    /// whether an entry was actually updated.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the update fails.
    pub async fn set_quantity(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, CartError> {
        Ok(self
            .carts
            .set_quantity(user, product_id, quantity.max(1))
            .await?)
    }

    /// Remove a listing from the cart. Removing something that isn't there
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    pub async fn remove(&self, user: UserId, product_id: ProductId) -> Result<(), CartError> {
        self.carts.remove(user, product_id).await?;
        Ok(())
    }

    /// Whether the listing is already in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn contains(&self, user: UserId, product_id: ProductId) -> Result<bool, CartError> {
        Ok(self.carts.contains(user, product_id).await?)
    }
}
