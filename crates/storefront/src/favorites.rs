//! Favorited dessert names.
//!
//! Set semantics over an insertion-ordered list, so the persisted JSON array
//! is stable between writes. Independent of the cart.

use std::collections::HashSet;

use dessert_storefront_core::ProductName;
use tracing::{debug, instrument};

use crate::persistence::PersistenceBridge;

/// Owner of the favorites set.
#[derive(Debug)]
pub struct FavoritesStore {
    names: Vec<ProductName>,
    persistence: PersistenceBridge,
    key: String,
}

impl FavoritesStore {
    /// Open the store with whatever is persisted under `key`.
    #[instrument(skip(persistence))]
    pub fn open(persistence: PersistenceBridge, key: &str) -> Self {
        let stored: Vec<ProductName> = persistence.load(key);

        let mut seen = HashSet::with_capacity(stored.len());
        let names: Vec<ProductName> = stored
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        debug!(favorites = names.len(), "Favorites opened");

        Self {
            names,
            persistence,
            key: key.to_owned(),
        }
    }

    /// Add `name` if absent, remove it if present. Persists the new set and
    /// returns whether `name` is now a favorite.
    pub fn toggle(&mut self, name: &ProductName) -> bool {
        let now_favorite = if let Some(index) = self.position(name) {
            self.names.remove(index);
            false
        } else {
            self.names.push(name.clone());
            true
        };

        debug!(%name, now_favorite, "Favorite toggled");
        self.persistence.save(&self.key, &self.names);
        now_favorite
    }

    #[must_use]
    pub fn is_favorite(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Favorites in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> &[ProductName] {
        &self.names
    }

    /// The favorites as a set, for the filter engine.
    #[must_use]
    pub fn as_set(&self) -> HashSet<ProductName> {
        self.names.iter().cloned().collect()
    }

    fn position(&self, name: &ProductName) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
