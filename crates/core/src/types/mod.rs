//! Core types for the dessert storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod dessert;
pub mod name;
pub mod price;

pub use dessert::{CartLine, CatalogEntry, DessertImage};
pub use name::{NameError, ProductName};
pub use price::{Price, PriceError};
