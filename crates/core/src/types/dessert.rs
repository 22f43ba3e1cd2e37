//! Catalog and cart records.
//!
//! The JSON layout of these types matches the catalog data file and the
//! persisted cart: a cart line is a catalog entry with an extra `quantity`.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::name::ProductName;
use super::price::Price;

/// Image references for one dessert, one per viewport size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DessertImage {
    pub thumbnail: String,
    pub mobile: String,
    pub tablet: String,
    pub desktop: String,
}

/// An immutable product record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Image variants.
    pub image: DessertImage,
    /// Unique name (primary key).
    pub name: ProductName,
    /// Category label, compared case-sensitively.
    pub category: String,
    /// Unit price.
    pub price: Price,
}

/// A catalog entry placed in the cart.
///
/// The quantity is never zero; a line that would drop to zero is removed
/// from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Create a line holding a single unit of `entry`.
    #[must_use]
    pub const fn new(entry: CatalogEntry) -> Self {
        Self {
            entry,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The product name of this line.
    #[must_use]
    pub const fn name(&self) -> &ProductName {
        &self.entry.name
    }

    /// The number of units as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.entry.price.times(self.quantity.get())
    }
}
