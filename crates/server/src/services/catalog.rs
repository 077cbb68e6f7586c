//! Listing lifecycle: create, browse, view, edit, delete.
//!
//! Image files themselves are handled by [`super::media`]; this service only
//! tracks their `/uploads/` references and tells callers which files became
//! unreferenced so the routes can discard them.

use sqlx::SqlitePool;
use thiserror::Error;

use trove_core::{ProductId, UserId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::{
    BrowseQuery, ListingUpdate, NewListing, PLACEHOLDER_IMAGE, Product, ProductWithSeller,
};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The listing doesn't exist, or the caller doesn't own it.
    #[error("listing not found")]
    NotFound,

    /// Database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of updating a listing.
#[derive(Debug)]
pub struct UpdatedListing {
    /// The listing after the update.
    pub product: Product,
    /// Image references that the update displaced. Empty when the update
    /// kept the existing images.
    pub replaced_images: Vec<String>,
}

/// Service for browsing and managing listings.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Browse available listings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn browse(
        &self,
        query: &BrowseQuery,
    ) -> Result<Vec<ProductWithSeller>, CatalogError> {
        Ok(self.products.browse(query).await?)
    }

    /// Create a listing. A listing submitted without images gets the
    /// placeholder.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the insert fails.
    pub async fn create(
        &self,
        seller: UserId,
        mut listing: NewListing,
    ) -> Result<Product, CatalogError> {
        if listing.images.is_empty() {
            listing.images.push(PLACEHOLDER_IMAGE.to_string());
        }
        Ok(self.products.create(seller, &listing).await?)
    }

    /// A listing's detail view, with seller contact info. Viewing counts:
    /// the returned view counter includes this visit.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the listing doesn't exist.
    pub async fn detail(&self, id: ProductId) -> Result<ProductWithSeller, CatalogError> {
        match self.products.increment_views(id).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(CatalogError::NotFound),
            Err(e) => return Err(e.into()),
        }

        self.products
            .get_with_seller(id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// A listing for its owner's edit form.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the listing doesn't exist or
    /// belongs to someone else.
    pub async fn listing_for_edit(
        &self,
        id: ProductId,
        seller: UserId,
    ) -> Result<Product, CatalogError> {
        self.products
            .get_owned(id, seller)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Update a listing. Only the owner may update; an update that carries
    /// new images displaces the old ones and reports them back for cleanup.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the listing doesn't exist or
    /// belongs to someone else.
    pub async fn update(
        &self,
        id: ProductId,
        seller: UserId,
        update: &ListingUpdate,
    ) -> Result<UpdatedListing, CatalogError> {
        let existing = self
            .products
            .get_owned(id, seller)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let replaced_images = if update.images.is_some() {
            existing.images
        } else {
            Vec::new()
        };

        let product = match self.products.update(id, seller, update).await {
            Ok(product) => product,
            Err(RepositoryError::NotFound) => return Err(CatalogError::NotFound),
            Err(e) => return Err(e.into()),
        };

        Ok(UpdatedListing {
            product,
            replaced_images,
        })
    }

    /// Delete a listing. Only the owner may delete. Returns the deleted
    /// listing so the caller can discard its image files.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the listing doesn't exist or
    /// belongs to someone else.
    pub async fn delete(&self, id: ProductId, seller: UserId) -> Result<Product, CatalogError> {
        self.products
            .delete(id, seller)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// All of a seller's listings, newest first, sold ones included.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn my_listings(&self, seller: UserId) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_seller(seller).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{UserRepository, test_pool};
    use trove_core::{Category, Condition, Email, Price, Username};

    async fn seed_seller(pool: &SqlitePool, username: &str) -> UserId {
        let repo = UserRepository::new(pool);
        let user = repo
            .create(
                &Username::parse(username).unwrap(),
                &Email::parse(&format!("{username}@example.com")).unwrap(),
                "$argon2id$fake-hash",
            )
            .await
            .unwrap();
        user.id
    }

    fn listing(title: &str, images: Vec<String>) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: format!("{title} in nice shape"),
            category: Category::Furniture,
            price: Price::parse("45").unwrap(),
            condition: Condition::Good,
            images,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_placeholder() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "seller").await;
        let catalog = CatalogService::new(&pool);

        let bare = catalog
            .create(seller, listing("Bare lamp", Vec::new()))
            .await
            .unwrap();
        assert_eq!(bare.images, vec![PLACEHOLDER_IMAGE]);

        let pictured = catalog
            .create(
                seller,
                listing("Pictured lamp", vec!["/uploads/a.jpg".to_string()]),
            )
            .await
            .unwrap();
        assert_eq!(pictured.images, vec!["/uploads/a.jpg"]);
    }

    #[tokio::test]
    async fn test_detail_counts_the_view() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "seller").await;
        let catalog = CatalogService::new(&pool);

        let created = catalog
            .create(seller, listing("Desk", Vec::new()))
            .await
            .unwrap();

        let first = catalog.detail(created.id).await.unwrap();
        assert_eq!(first.product.views, 1);
        assert_eq!(first.seller.username, "seller");

        let second = catalog.detail(created.id).await.unwrap();
        assert_eq!(second.product.views, 2);
    }

    #[tokio::test]
    async fn test_detail_missing_listing() {
        let pool = test_pool().await;
        let catalog = CatalogService::new(&pool);

        let result = catalog.detail(ProductId::new(999)).await;
        assert!(matches!(result, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_reports_replaced_images() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "seller").await;
        let catalog = CatalogService::new(&pool);

        let created = catalog
            .create(
                seller,
                listing("Chair", vec!["/uploads/old.jpg".to_string()]),
            )
            .await
            .unwrap();

        let update = ListingUpdate {
            title: "Chair".to_string(),
            description: "Reupholstered".to_string(),
            category: Category::Furniture,
            price: Price::parse("55").unwrap(),
            condition: Condition::Excellent,
            images: None,
            tags: Vec::new(),
        };

        // Keeping the images replaces nothing
        let kept = catalog.update(created.id, seller, &update).await.unwrap();
        assert!(kept.replaced_images.is_empty());
        assert_eq!(kept.product.images, vec!["/uploads/old.jpg"]);

        // New images displace the old ones
        let update = ListingUpdate {
            images: Some(vec!["/uploads/new.jpg".to_string()]),
            ..update
        };
        let swapped = catalog.update(created.id, seller, &update).await.unwrap();
        assert_eq!(swapped.replaced_images, vec!["/uploads/old.jpg"]);
        assert_eq!(swapped.product.images, vec!["/uploads/new.jpg"]);
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "seller").await;
        let intruder = seed_seller(&pool, "intruder").await;
        let catalog = CatalogService::new(&pool);

        let created = catalog
            .create(seller, listing("Desk", Vec::new()))
            .await
            .unwrap();

        let update = ListingUpdate {
            title: "Hijacked".to_string(),
            description: "x".to_string(),
            category: Category::Furniture,
            price: Price::parse("1").unwrap(),
            condition: Condition::Poor,
            images: None,
            tags: Vec::new(),
        };
        let result = catalog.update(created.id, intruder, &update).await;
        assert!(matches!(result, Err(CatalogError::NotFound)));

        let result = catalog.listing_for_edit(created.id, intruder).await;
        assert!(matches!(result, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_returns_listing_for_cleanup() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "seller").await;
        let intruder = seed_seller(&pool, "intruder").await;
        let catalog = CatalogService::new(&pool);

        let created = catalog
            .create(
                seller,
                listing("Lamp", vec!["/uploads/lamp.jpg".to_string()]),
            )
            .await
            .unwrap();

        let result = catalog.delete(created.id, intruder).await;
        assert!(matches!(result, Err(CatalogError::NotFound)));

        let deleted = catalog.delete(created.id, seller).await.unwrap();
        assert_eq!(deleted.images, vec!["/uploads/lamp.jpg"]);
        assert!(catalog.my_listings(seller).await.unwrap().is_empty());
    }
}
