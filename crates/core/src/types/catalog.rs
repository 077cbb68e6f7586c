//! Fixed catalog enumerations.
//!
//! These sets are shared by listing validation, browse filtering, and the
//! form dropdowns, so they live in core rather than the server crate.

use serde::{Deserialize, Serialize};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Furniture,
    Books,
    Sports,
    Toys,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Automotive,
    Beauty,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 10] = [
        Self::Electronics,
        Self::Clothing,
        Self::Furniture,
        Self::Books,
        Self::Sports,
        Self::Toys,
        Self::HomeAndGarden,
        Self::Automotive,
        Self::Beauty,
        Self::Other,
    ];

    /// The display label, which is also the stored form.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Furniture => "Furniture",
            Self::Books => "Books",
            Self::Sports => "Sports",
            Self::Toys => "Toys",
            Self::HomeAndGarden => "Home & Garden",
            Self::Automotive => "Automotive",
            Self::Beauty => "Beauty",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// Physical condition of a second-hand item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    /// All conditions in display order.
    pub const ALL: [Self; 4] = [Self::Excellent, Self::Good, Self::Fair, Self::Poor];

    /// The display label, which is also the stored form.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| format!("invalid condition: {s}"))
    }
}

/// Lifecycle status of a listing.
///
/// Transitions to `Sold` happen only through checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Sold => write!(f, "sold"),
            Self::Reserved => write!(f, "reserved"),
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            "reserved" => Ok(Self::Reserved),
            _ => Err(format!("invalid listing status: {s}")),
        }
    }
}

/// Browse result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Oldest => write!(f, "oldest"),
            Self::PriceLow => write!(f, "price_low"),
            Self::PriceHigh => write!(f, "price_high"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "price_low" => Ok(Self::PriceLow),
            "price_high" => Ok(Self::PriceHigh),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_ampersand_label() {
        assert_eq!(Category::HomeAndGarden.to_string(), "Home & Garden");
        assert_eq!(
            "Home & Garden".parse::<Category>().unwrap(),
            Category::HomeAndGarden
        );
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert!("Weapons".parse::<Category>().is_err());
        assert!("electronics".parse::<Category>().is_err());
    }

    #[test]
    fn test_condition_default_is_good() {
        assert_eq!(Condition::default(), Condition::Good);
    }

    #[test]
    fn test_condition_label_roundtrip() {
        for condition in Condition::ALL {
            assert_eq!(condition.label().parse::<Condition>().unwrap(), condition);
        }
    }

    #[test]
    fn test_status_display_lowercase() {
        assert_eq!(ListingStatus::Available.to_string(), "available");
        assert_eq!(ListingStatus::Sold.to_string(), "sold");
        assert_eq!(ListingStatus::Reserved.to_string(), "reserved");
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ListingStatus::Available,
            ListingStatus::Sold,
            ListingStatus::Reserved,
        ] {
            assert_eq!(
                status.to_string().parse::<ListingStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_sort_order_default() {
        assert_eq!(SortOrder::default(), SortOrder::Newest);
    }

    #[test]
    fn test_sort_order_tokens() {
        assert_eq!("price_low".parse::<SortOrder>().unwrap(), SortOrder::PriceLow);
        assert_eq!("price_high".parse::<SortOrder>().unwrap(), SortOrder::PriceHigh);
        assert_eq!("oldest".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ListingStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");
    }
}
