//! Business logic services for the marketplace.
//!
//! # Services
//!
//! - `auth` - Registration, login, and profile management
//! - `catalog` - Listing lifecycle: browse, detail, create, edit, delete
//! - `cart` - Per-user shopping cart
//! - `checkout` - Converting a cart into purchases
//! - `media` - Uploaded listing images on disk
//!
//! Services own the business rules; routes translate their errors into
//! redirects and flash notices.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod media;
