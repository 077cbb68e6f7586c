//! Listing price type backed by decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative listing price.
///
/// Prices are plain decimal amounts with no currency dimension; the
/// marketplace displays everything in one currency. Decimal arithmetic
/// avoids float drift when summing cart totals.
///
/// ## Examples
///
/// ```
/// use trove_core::Price;
///
/// let price = Price::parse("250").unwrap();
/// assert_eq!(price.to_string(), "250");
///
/// assert!(Price::parse("19.99").is_ok());
/// assert!(Price::parse("-5").is_err());
/// assert!(Price::parse("cheap").is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a `Price` from a decimal string.
    ///
    /// Leading and trailing whitespace is trimmed before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the input is not a decimal
    /// number, or [`PriceError::Negative`] if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Create a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, for cart line totals.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add another price, for cart grand totals.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        let price = Price::parse("250").unwrap();
        assert_eq!(price.amount(), Decimal::new(250, 0));
    }

    #[test]
    fn test_parse_fractional() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(Price::parse(" 10.50 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(Price::parse("-5"), Err(PriceError::Negative)));
        assert!(matches!(Price::parse("-0.01"), Err(PriceError::Negative)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::parse(""), Err(PriceError::NotANumber)));
        assert!(matches!(Price::parse("cheap"), Err(PriceError::NotANumber)));
        assert!(matches!(Price::parse("10,50"), Err(PriceError::NotANumber)));
    }

    #[test]
    fn test_display_roundtrip() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(Price::parse(&price.to_string()).unwrap(), price);
    }

    #[test]
    fn test_ordering() {
        let low = Price::parse("9.99").unwrap();
        let high = Price::parse("100").unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_times_and_plus() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(price.times(3), Price::parse("59.97").unwrap());
        assert_eq!(
            price.plus(Price::parse("0.01").unwrap()),
            Price::parse("20.00").unwrap()
        );
    }

    #[test]
    fn test_serde_as_string() {
        // serde-with-str keeps decimals exact in JSON
        let price = Price::parse("19.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
