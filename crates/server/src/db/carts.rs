//! Cart repository for database operations.
//!
//! Cart rows reference products weakly: reads join `products` so entries
//! whose listing has been deleted simply vanish from the cart instead of
//! erroring.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use trove_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartEntry;

#[derive(sqlx::FromRow)]
struct CartEntryRow {
    #[sqlx(flatten)]
    product: super::products::ProductRow,
    seller_username: String,
    quantity: i64,
    added_at: DateTime<Utc>,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already in the cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, added_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product already in cart".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Remove a product from a user's cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if an entry was removed, `false` if it wasn't there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
            .bind(user_id.as_i64())
            .bind(product_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the quantity of an existing cart entry.
    ///
    /// # Returns
    ///
    /// Returns `true` if an entry was updated, `false` if the product is
    /// not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE cart_items SET quantity = ? WHERE user_id = ? AND product_id = ?")
                .bind(quantity)
                .bind(user_id.as_i64())
                .bind(product_id.as_i64())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a product is in a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cart_items WHERE user_id = ? AND product_id = ?)",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(self.pool)
        .await?;

        Ok(found)
    }

    /// All cart entries for a user in insertion order, joined with their
    /// listing and seller. Entries whose product no longer exists are
    /// silently dropped by the join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored listing is invalid.
    pub async fn entries(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        let rows: Vec<CartEntryRow> = sqlx::query_as(
            "SELECT p.id, p.title, p.description, p.category, p.price, p.condition, \
                    p.images, p.seller_id, p.status, p.views, p.tags, \
                    p.created_at, p.updated_at, \
                    u.username AS seller_username, ci.quantity, ci.added_at \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             JOIN users u ON u.id = p.seller_id \
             WHERE ci.user_id = ? \
             ORDER BY ci.added_at ASC",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CartEntry {
                    product: row.product.into_domain()?,
                    seller_username: row.seller_username,
                    quantity: row.quantity,
                    added_at: row.added_at,
                })
            })
            .collect()
    }

    /// Remove every entry from a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
