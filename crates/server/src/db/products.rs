//! Product repository for database operations.
//!
//! Listings join their seller for browse and detail reads. Ownership checks
//! are pushed into the SQL (`WHERE id = ? AND seller_id = ?`) so a seller
//! can never edit or delete someone else's listing through this module.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use trove_core::{Category, Condition, ListingStatus, Price, ProductId, SortOrder, UserId};

use super::RepositoryError;
use crate::models::product::{
    BrowseQuery, ListingUpdate, NewListing, Product, ProductWithSeller, SellerContact,
};

/// Maximum rows returned by a browse query.
const BROWSE_LIMIT: u32 = 50;

/// Raw `products` row; validated into [`Product`] before leaving the db layer.
///
/// Shared with the cart and purchase repositories, which flatten it into
/// their own join rows.
#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    price: String,
    condition: String,
    images: String,
    seller_id: i64,
    status: String,
    views: i64,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ProductSellerRow {
    #[sqlx(flatten)]
    product: ProductRow,
    seller_username: String,
    seller_email: String,
    seller_phone: Option<String>,
}

impl ProductRow {
    pub(super) fn into_domain(self) -> Result<Product, RepositoryError> {
        let category: Category = self.category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
        })?;
        let condition: Condition = self.condition.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid condition in database: {e}"))
        })?;
        let status: ListingStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;
        let price = Price::parse(&self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;
        let images: Vec<String> = serde_json::from_str(&self.images).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid images in database: {e}"))
        })?;
        let tags: Vec<String> = serde_json::from_str(&self.tags).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tags in database: {e}"))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            title: self.title,
            description: self.description,
            category,
            price,
            condition,
            images,
            seller_id: UserId::new(self.seller_id),
            status,
            views: self.views,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProductSellerRow {
    fn into_domain(self) -> Result<ProductWithSeller, RepositoryError> {
        Ok(ProductWithSeller {
            product: self.product.into_domain()?,
            seller: SellerContact {
                username: self.seller_username,
                email: self.seller_email,
                phone: self.seller_phone,
            },
        })
    }
}

fn serialize_strings(values: &[String], what: &str) -> Result<String, RepositoryError> {
    serde_json::to_string(values)
        .map_err(|e| RepositoryError::DataCorruption(format!("failed to serialize {what}: {e}")))
}

/// Escape LIKE wildcards in a user-supplied search term.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

const PRODUCT_COLUMNS: &str = "id, title, description, category, price, condition, images, \
                               seller_id, status, views, tags, created_at, updated_at";

const PRODUCT_SELLER_COLUMNS: &str =
    "p.id, p.title, p.description, p.category, p.price, p.condition, p.images, \
     p.seller_id, p.status, p.views, p.tags, p.created_at, p.updated_at, \
     u.username AS seller_username, u.email AS seller_email, u.phone AS seller_phone";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Browse available listings with optional search, category filter, and
    /// ordering. Returns at most [`BROWSE_LIMIT`] rows.
    ///
    /// The search term matches title, description, and tags
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored listing is invalid.
    pub async fn browse(
        &self,
        query: &BrowseQuery,
    ) -> Result<Vec<ProductWithSeller>, RepositoryError> {
        let mut sql = format!(
            "SELECT {PRODUCT_SELLER_COLUMNS} \
             FROM products p JOIN users u ON u.id = p.seller_id \
             WHERE p.status = 'available'"
        );

        if query.search.is_some() {
            sql.push_str(
                " AND (LOWER(p.title) LIKE ? ESCAPE '\\' \
                   OR LOWER(p.description) LIKE ? ESCAPE '\\' \
                   OR LOWER(p.tags) LIKE ? ESCAPE '\\')",
            );
        }
        if query.category.is_some() {
            sql.push_str(" AND p.category = ?");
        }

        sql.push_str(match query.sort {
            SortOrder::Newest => " ORDER BY p.created_at DESC",
            SortOrder::Oldest => " ORDER BY p.created_at ASC",
            SortOrder::PriceLow => " ORDER BY CAST(p.price AS REAL) ASC",
            SortOrder::PriceHigh => " ORDER BY CAST(p.price AS REAL) DESC",
        });
        sql.push_str(&format!(" LIMIT {BROWSE_LIMIT}"));

        let mut db_query = sqlx::query_as::<_, ProductSellerRow>(&sql);
        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            db_query = db_query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some(category) = query.category {
            db_query = db_query.bind(category.to_string());
        }

        let rows = db_query.fetch_all(self.pool).await?;
        rows.into_iter().map(ProductSellerRow::into_domain).collect()
    }

    /// Get a listing with its seller, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored listing is invalid.
    pub async fn get_with_seller(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithSeller>, RepositoryError> {
        let row: Option<ProductSellerRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_SELLER_COLUMNS} \
             FROM products p JOIN users u ON u.id = p.seller_id \
             WHERE p.id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductSellerRow::into_domain).transpose()
    }

    /// Get a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored listing is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Get a listing only if it belongs to the given seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored listing is invalid.
    pub async fn get_owned(
        &self,
        id: ProductId,
        seller_id: UserId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND seller_id = ?"
        ))
        .bind(id.as_i64())
        .bind(seller_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// All listings by a seller, newest first, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored listing is invalid.
    pub async fn list_by_seller(
        &self,
        seller_id: UserId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE seller_id = ? ORDER BY created_at DESC"
        ))
        .bind(seller_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_domain).collect()
    }

    /// Create a new listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        seller_id: UserId,
        listing: &NewListing,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();

        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products \
             (title, description, category, price, condition, images, seller_id, \
              status, views, tags, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 'available', 0, ?, ?, ?) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.category.to_string())
        .bind(listing.price.to_string())
        .bind(listing.condition.to_string())
        .bind(serialize_strings(&listing.images, "images")?)
        .bind(seller_id.as_i64())
        .bind(serialize_strings(&listing.tags, "tags")?)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Update a listing owned by the given seller.
    ///
    /// When `update.images` is `None` the existing images are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist or
    /// belongs to another seller.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        seller_id: UserId,
        update: &ListingUpdate,
    ) -> Result<Product, RepositoryError> {
        let images_json = update
            .images
            .as_deref()
            .map(|images| serialize_strings(images, "images"))
            .transpose()?;

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products \
             SET title = ?, description = ?, category = ?, price = ?, condition = ?, \
                 images = COALESCE(?, images), tags = ?, updated_at = ? \
             WHERE id = ? AND seller_id = ? \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.category.to_string())
        .bind(update.price.to_string())
        .bind(update.condition.to_string())
        .bind(images_json)
        .bind(serialize_strings(&update.tags, "tags")?)
        .bind(Utc::now())
        .bind(id.as_i64())
        .bind(seller_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), ProductRow::into_domain)
    }

    /// Delete a listing owned by the given seller, returning it so the
    /// caller can clean up its image files.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored listing is invalid.
    pub async fn delete(
        &self,
        id: ProductId,
        seller_id: UserId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM products WHERE id = ? AND seller_id = ? RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i64())
        .bind(seller_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Increment a listing's view counter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn increment_views(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET views = views + 1 WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark a listing as sold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_sold(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET status = 'sold', updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
