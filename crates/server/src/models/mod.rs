//! Domain models for the marketplace.
//!
//! These types represent validated domain objects separate from database
//! row types and from the template view models in `routes`.

pub mod cart;
pub mod product;
pub mod purchase;
pub mod session;
pub mod user;
