//! Application root.
//!
//! A [`Storefront`] is built once and owns the cart, the favorites and the
//! current filter selection. Consumers receive it (or a
//! [`StorefrontHandle`](crate::handle::StorefrontHandle) to it) explicitly;
//! there is no global lookup.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dessert_storefront_core::{CatalogEntry, ProductName};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::cart::{CartState, CartStore};
use crate::catalog::Catalog;
use crate::config::{StorageKeys, StorefrontConfig};
use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::error::{ContextError, Result};
use crate::favorites::FavoritesStore;
use crate::filter::{FilterCriteria, FilterEngine, results_label};
use crate::persistence::{
    FileStore, KeyValueStore, PersistenceBridge, PersistenceObserver, TracingObserver,
};
use crate::view::{CartView, OrderConfirmationView, ShopView, compose_items};

/// The storefront engine: catalog, cart, favorites and filters.
#[derive(Debug)]
pub struct Storefront {
    engine: FilterEngine,
    cart: CartStore,
    favorites: FavoritesStore,
    criteria: FilterCriteria,
    search_debounce: Duration,
}

impl Storefront {
    #[must_use]
    pub fn builder() -> StorefrontBuilder {
        StorefrontBuilder::default()
    }

    /// Build from configuration with a [`FileStore`] in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded.
    #[instrument(skip(config), fields(data_dir = %config.data_dir.display()))]
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };

        let storefront = Self::builder()
            .catalog(catalog)
            .store(FileStore::new(&config.data_dir))
            .storage_keys(config.storage_keys.clone())
            .search_debounce(config.search_debounce)
            .build()?;
        Ok(storefront)
    }

    // -------------------------------------------------------------------------
    // Cart intents
    // -------------------------------------------------------------------------

    pub fn add(&mut self, entry: &CatalogEntry) {
        self.cart.add(entry.clone());
    }

    /// Add one unit of the catalog entry called `name`. Returns `false` if
    /// the catalog has no such entry.
    pub fn add_by_name(&mut self, name: &str) -> bool {
        let Some(entry) = self.engine.catalog().get(name).cloned() else {
            debug!(name, "Add ignored, not in catalog");
            return false;
        };
        self.cart.add(entry);
        true
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(name) = parse_name(name) {
            self.cart.remove(name);
        }
    }

    pub fn set_quantity(&mut self, name: &str, quantity: i64) {
        if let Some(name) = parse_name(name) {
            self.cart.set_quantity(name, quantity);
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn confirm_order(&mut self) {
        self.cart.confirm();
    }

    /// Dismiss the confirmation and start over with an empty cart.
    pub fn start_new_order(&mut self) {
        self.cart.clear();
    }

    // -------------------------------------------------------------------------
    // Favorites intents
    // -------------------------------------------------------------------------

    /// Returns whether `name` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        parse_name(name).is_some_and(|name| self.favorites.toggle(&name))
    }

    // -------------------------------------------------------------------------
    // Filter intents
    // -------------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.set_search(search);
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.criteria.set_category(category);
    }

    pub const fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        self.criteria.set_price_range(min, max);
    }

    pub const fn toggle_favorites_only(&mut self) {
        self.criteria.toggle_favorites_only();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState {
        self.cart.state()
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.catalog().categories()
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    /// Visible entries under the current criteria, in catalog order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&CatalogEntry> {
        self.engine.filter(&self.criteria, &self.favorite_set())
    }

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from(self.cart())
    }

    /// The full view model for one render.
    #[must_use]
    pub fn view(&self) -> ShopView {
        let visible = self.filtered();
        let cart = self.cart();
        ShopView {
            items: compose_items(&visible, cart, &self.favorites),
            results_label: results_label(visible.len()),
            categories: self.categories(),
            criteria: self.criteria.clone(),
            has_active_filters: self.has_active_filters(),
            favorites_count: self.favorites.count(),
            cart: CartView::from(cart),
            order_confirmed: cart.is_order_confirmed(),
            confirmation: OrderConfirmationView::for_cart(cart),
        }
    }

    fn favorite_set(&self) -> HashSet<ProductName> {
        self.favorites.as_set()
    }
}

/// Names that cannot be valid product names cannot be in the cart either.
fn parse_name(name: &str) -> Option<ProductName> {
    ProductName::parse(name)
        .inspect_err(|e| debug!(name, error = %e, "Ignoring intent for invalid name"))
        .ok()
}

/// Builder for [`Storefront`].
///
/// The catalog and the store are required. Building without either is a
/// context-misuse error.
pub struct StorefrontBuilder {
    catalog: Option<Catalog>,
    store: Option<Arc<dyn KeyValueStore>>,
    observer: Arc<dyn PersistenceObserver>,
    storage_keys: StorageKeys,
    search_debounce: Duration,
}

impl Default for StorefrontBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            store: None,
            observer: Arc::new(TracingObserver),
            storage_keys: StorageKeys::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl StorefrontBuilder {
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    #[must_use]
    pub fn shared_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn PersistenceObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn storage_keys(mut self, keys: StorageKeys) -> Self {
        self.storage_keys = keys;
        self
    }

    #[must_use]
    pub const fn search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    /// Restore persisted state and return the ready storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Missing`] if the catalog or the store was not
    /// provided.
    pub fn build(self) -> std::result::Result<Storefront, ContextError> {
        let catalog = self.catalog.ok_or(ContextError::Missing("a catalog"))?;
        let store = self.store.ok_or(ContextError::Missing("a key-value store"))?;

        let persistence = PersistenceBridge::from_parts(store, self.observer);
        let cart = CartStore::open(persistence.clone(), &self.storage_keys.cart);
        let favorites = FavoritesStore::open(persistence, &self.storage_keys.favorites);

        tracing::info!(
            entries = catalog.len(),
            cart_lines = cart.state().lines().len(),
            favorites = favorites.count(),
            "Storefront ready"
        );

        Ok(Storefront {
            engine: FilterEngine::new(Arc::new(catalog)),
            cart,
            favorites,
            criteria: FilterCriteria::default(),
            search_debounce: self.search_debounce,
        })
    }
}
