//! Purchase repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use trove_core::{Price, ProductId, PurchaseId, UserId};

use super::RepositoryError;
use crate::models::purchase::PurchaseRecord;

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    purchase_id: i64,
    price_paid: String,
    purchased_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: super::products::ProductRow,
    seller_username: String,
}

/// Repository for purchase database operations.
pub struct PurchaseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a purchase at the given price.
    ///
    /// The price is copied from the listing at checkout time so later price
    /// edits never rewrite history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        user_id: UserId,
        product_id: ProductId,
        price: Price,
    ) -> Result<PurchaseId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO purchases (user_id, product_id, price, purchased_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(price.to_string())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(PurchaseId::new(id))
    }

    /// A user's purchase history, most recent first, joined with the
    /// listing and seller. Purchases whose product has since been deleted
    /// are dropped by the join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            "SELECT pu.id AS purchase_id, pu.price AS price_paid, pu.purchased_at, \
                    p.id, p.title, p.description, p.category, p.price, p.condition, \
                    p.images, p.seller_id, p.status, p.views, p.tags, \
                    p.created_at, p.updated_at, \
                    u.username AS seller_username \
             FROM purchases pu \
             JOIN products p ON p.id = pu.product_id \
             JOIN users u ON u.id = p.seller_id \
             WHERE pu.user_id = ? \
             ORDER BY pu.purchased_at DESC",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let price_paid = Price::parse(&row.price_paid).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
                })?;

                Ok(PurchaseRecord {
                    id: PurchaseId::new(row.purchase_id),
                    product: row.product.into_domain()?,
                    seller_username: row.seller_username,
                    price_paid,
                    purchased_at: row.purchased_at,
                })
            })
            .collect()
    }
}
