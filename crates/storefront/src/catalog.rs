//! The immutable dessert catalog.
//!
//! Loaded once at startup and never mutated. Names are unique because every
//! other part of the storefront uses the name as the primary key.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use dessert_storefront_core::{CatalogEntry, ProductName};
use thiserror::Error;
use tracing::instrument;

use crate::filter::ALL_CATEGORIES;

/// Catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../data/desserts.json");

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries share a name.
    #[error("duplicate product name in catalog: {0}")]
    DuplicateName(ProductName),

    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON is malformed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered list of catalog entries with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] if two entries share a name.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.name) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalog from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicate names.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(entries = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The nine-dessert catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data file is corrupt.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// All entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories sorted ascending, with the "All" sentinel first.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();

        std::iter::once(ALL_CATEGORIES)
            .chain(distinct)
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use dessert_storefront_core::{DessertImage, Price};

    use super::*;

    /// Build a catalog entry with placeholder images.
    pub(crate) fn entry(name: &str, category: &str, cents: u32) -> CatalogEntry {
        CatalogEntry {
            image: DessertImage {
                thumbnail: format!("{name}-thumbnail.jpg"),
                mobile: format!("{name}-mobile.jpg"),
                tablet: format!("{name}-tablet.jpg"),
                desktop: format!("{name}-desktop.jpg"),
            },
            name: ProductName::parse(name).unwrap(),
            category: category.to_string(),
            price: Price::from_cents(cents),
        }
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(
            catalog.entries().first().map(|e| e.name.as_str()),
            Some("Waffle with Berries")
        );
        assert_eq!(
            catalog.get("Classic Tiramisu").map(|e| e.price),
            Some(Price::from_cents(550))
        );
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Catalog::from_entries(vec![
            entry("Waffle", "Waffle", 650),
            entry("Waffle", "Cake", 450),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateName(name)) if name == "Waffle"));
    }

    #[test]
    fn test_get_is_exact() {
        let catalog = Catalog::from_entries(vec![entry("Waffle", "Waffle", 650)]).unwrap();
        assert!(catalog.get("Waffle").is_some());
        assert!(catalog.get("waffle").is_none());
    }

    #[test]
    fn test_categories_sorted_with_sentinel() {
        let catalog = Catalog::from_entries(vec![
            entry("Waffle", "Waffle", 650),
            entry("Red Velvet Cake", "Cake", 450),
            entry("Berry Waffle", "Waffle", 700),
            entry("Pistachio Baklava", "Baklava", 400),
        ])
        .unwrap();

        assert_eq!(catalog.categories(), vec!["All", "Baklava", "Cake", "Waffle"]);
    }

    #[test]
    fn test_categories_of_empty_catalog() {
        let catalog = Catalog::from_entries(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.categories(), vec!["All"]);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desserts.json");
        std::fs::write(&path, BUNDLED_CATALOG).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog, Catalog::bundled().unwrap());

        let missing = Catalog::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }
}
