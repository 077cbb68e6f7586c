//! Product domain types.

use chrono::{DateTime, Utc};

use trove_core::{Category, Condition, ListingStatus, Price, ProductId, UserId};

/// Bundled image shown for listings created without photos.
///
/// Served from the static assets directory, not the upload directory, so
/// the media store must never delete it.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder-product.jpg";

/// A marketplace listing (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Category from the fixed catalog set.
    pub category: Category,
    /// Asking price.
    pub price: Price,
    /// Physical condition of the item.
    pub condition: Condition,
    /// Image URL paths, never empty (a placeholder is substituted on create).
    pub images: Vec<String>,
    /// User who listed the item.
    pub seller_id: UserId,
    /// Lifecycle status.
    pub status: ListingStatus,
    /// Detail page view counter.
    pub views: i64,
    /// Free-form search tags.
    pub tags: Vec<String>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image path, used as the thumbnail in list views.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }
}

/// Public seller details shown on product pages.
#[derive(Debug, Clone)]
pub struct SellerContact {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A listing joined with its seller, as read by browse and detail queries.
#[derive(Debug, Clone)]
pub struct ProductWithSeller {
    pub product: Product,
    pub seller: SellerContact,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Price,
    pub condition: Condition,
    /// Image paths from the media store; empty means "use the placeholder".
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

/// Validated input for editing a listing.
///
/// `images` is `None` when the seller uploaded no new files, in which case
/// the existing images are kept.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Price,
    pub condition: Condition,
    pub images: Option<Vec<String>>,
    pub tags: Vec<String>,
}

/// Filter and ordering options for the browse query.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    /// Case-insensitive substring match on title, description, and tags.
    pub search: Option<String>,
    /// Restrict to a single category.
    pub category: Option<Category>,
    /// Result ordering, newest first by default.
    pub sort: trove_core::SortOrder,
}

/// Split a comma-separated tags field into trimmed, non-empty tags.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_splits_and_trims() {
        let tags = parse_tags("Retro, denim , ,jacket");
        assert_eq!(tags, vec!["retro", "denim", "jacket"]);
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_primary_image_placeholder_when_empty() {
        let product = Product {
            id: ProductId::new(1),
            title: "Lamp".to_string(),
            description: "A lamp".to_string(),
            category: Category::Furniture,
            price: Price::parse("10").unwrap(),
            condition: Condition::Good,
            images: Vec::new(),
            seller_id: UserId::new(1),
            status: ListingStatus::Available,
            views: 0,
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.primary_image(), PLACEHOLDER_IMAGE);
    }
}
