//! Catalog filtering.
//!
//! An entry is visible when it passes every criterion at once: search text,
//! category, price band and the favorites-only switch. Results keep catalog
//! order.
//!
//! The default price band is a fixed `[0, 100]` convention and is not derived
//! from the catalog, so entries priced above 100 are hidden until the band is
//! widened.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use dessert_storefront_core::{CatalogEntry, ProductName};
use moka::sync::Cache;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::Catalog;

/// Category sentinel meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Lower bound of the default price band.
pub const DEFAULT_MIN_PRICE: Decimal = Decimal::ZERO;

/// Upper bound of the default price band.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::ONE_HUNDRED;

/// Maximum number of memoized filter results.
const FILTER_CACHE_CAPACITY: u64 = 256;

/// The current filter selection.
///
/// Owned by the UI layer and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name and category.
    pub search: String,
    /// Exact category, or [`ALL_CATEGORIES`].
    pub category: String,
    /// Inclusive lower price bound.
    pub min_price: Decimal,
    /// Inclusive upper price bound.
    pub max_price: Decimal,
    /// Only show favorited entries.
    pub favorites_only: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_owned(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            favorites_only: false,
        }
    }
}

impl FilterCriteria {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Set both price bounds. An inverted band simply matches nothing.
    pub const fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        self.min_price = min;
        self.max_price = max;
    }

    pub const fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
    }

    /// Reset every criterion to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when any criterion differs from its default.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.category != ALL_CATEGORIES
            || self.min_price > DEFAULT_MIN_PRICE
            || self.max_price < DEFAULT_MAX_PRICE
            || self.favorites_only
    }

    /// Whether a single entry passes all criteria.
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry, favorites: &HashSet<ProductName>) -> bool {
        self.matches_search(entry)
            && (self.category == ALL_CATEGORIES || entry.category == self.category)
            && (self.min_price..=self.max_price).contains(&entry.price.amount())
            && (!self.favorites_only || favorites.contains(&entry.name))
    }

    fn matches_search(&self, entry: &CatalogEntry) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        entry.name.as_str().to_lowercase().contains(&needle)
            || entry.category.to_lowercase().contains(&needle)
    }
}

/// Entries that pass `criteria`, in catalog order.
#[must_use]
pub fn filter_entries<'a>(
    entries: &'a [CatalogEntry],
    criteria: &FilterCriteria,
    favorites: &HashSet<ProductName>,
) -> Vec<&'a CatalogEntry> {
    entries
        .iter()
        .filter(|entry| criteria.matches(entry, favorites))
        .collect()
}

/// Parse the minimum-price text field. Unparsable input reads as 0.
#[must_use]
pub fn parse_min_price(input: &str) -> Decimal {
    parse_price_input(input).unwrap_or(DEFAULT_MIN_PRICE)
}

/// Parse the maximum-price text field.
///
/// Unparsable input reads as 100, and so does an explicit zero: a maximum of
/// zero is treated as "not set" rather than "nothing is affordable".
#[must_use]
pub fn parse_max_price(input: &str) -> Decimal {
    parse_price_input(input)
        .filter(|value| !value.is_zero())
        .unwrap_or(DEFAULT_MAX_PRICE)
}

fn parse_price_input(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim()).ok()
}

/// "1 dessert found" / "3 desserts found".
#[must_use]
pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 dessert found".to_owned()
    } else {
        format!("{count} desserts found")
    }
}

/// Cache key: the criteria plus the favorites set in a canonical order.
type FilterKey = (FilterCriteria, Vec<ProductName>);

/// Memoizing front for [`filter_entries`] over one immutable catalog.
///
/// Results are cached as entry indices keyed by criteria and favorites, so a
/// repeated render with unchanged inputs skips the scan.
#[derive(Clone)]
pub struct FilterEngine {
    catalog: Arc<Catalog>,
    cache: Cache<FilterKey, Arc<[usize]>>,
}

impl FilterEngine {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            cache: Cache::new(FILTER_CACHE_CAPACITY),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Entries that pass `criteria`, in catalog order.
    #[must_use]
    pub fn filter(
        &self,
        criteria: &FilterCriteria,
        favorites: &HashSet<ProductName>,
    ) -> Vec<&CatalogEntry> {
        let mut sorted: Vec<ProductName> = favorites.iter().cloned().collect();
        sorted.sort_unstable();

        let indices = self.cache.get_with((criteria.clone(), sorted), || {
            self.catalog
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, entry)| criteria.matches(entry, favorites))
                .map(|(index, _)| index)
                .collect()
        });

        indices
            .iter()
            .filter_map(|&index| self.catalog.entries().get(index))
            .collect()
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("entries", &self.catalog.len())
            .field("cached_results", &self.cache.entry_count())
            .finish()
    }
}
