//! Integration tests for the dessert storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dessert-storefront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart state machine driven through the storefront
//! - `filtering` - Filter engine scenarios over small catalogs
//! - `persistence` - Restarts over file storage and failing storage
//! - `handle` - Intents from several tasks through the owning task
//!
//! This crate only holds shared fixtures; the tests live in `tests/`.

use std::sync::{Arc, Mutex};

use dessert_storefront::ContextError;
use dessert_storefront::Storefront;
use dessert_storefront::catalog::{Catalog, CatalogError};
use dessert_storefront::persistence::{
    KeyValueStore, PersistenceFailure, PersistenceObserver, PersistenceOp,
};

/// Three entries across two categories.
pub const THREE_ENTRY_CATALOG: &str = r#"[
  {
    "image": {
      "thumbnail": "./assets/images/image-waffle-thumbnail.jpg",
      "mobile": "./assets/images/image-waffle-mobile.jpg",
      "tablet": "./assets/images/image-waffle-tablet.jpg",
      "desktop": "./assets/images/image-waffle-desktop.jpg"
    },
    "name": "Waffle",
    "category": "Waffle",
    "price": 6.5
  },
  {
    "image": {
      "thumbnail": "./assets/images/image-belgian-waffle-thumbnail.jpg",
      "mobile": "./assets/images/image-belgian-waffle-mobile.jpg",
      "tablet": "./assets/images/image-belgian-waffle-tablet.jpg",
      "desktop": "./assets/images/image-belgian-waffle-desktop.jpg"
    },
    "name": "Belgian Waffle",
    "category": "Waffle",
    "price": 8.0
  },
  {
    "image": {
      "thumbnail": "./assets/images/image-cake-thumbnail.jpg",
      "mobile": "./assets/images/image-cake-mobile.jpg",
      "tablet": "./assets/images/image-cake-tablet.jpg",
      "desktop": "./assets/images/image-cake-desktop.jpg"
    },
    "name": "Red Velvet Cake",
    "category": "Cake",
    "price": 4.5
  }
]"#;

/// Parse [`THREE_ENTRY_CATALOG`].
///
/// # Errors
///
/// Returns an error if the fixture no longer parses.
pub fn three_entry_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(THREE_ENTRY_CATALOG)
}

/// Storefront over `catalog` and `store` that reports persistence failures
/// to `observer`.
///
/// # Errors
///
/// Never fails in practice; both required parts are supplied.
pub fn storefront_with(
    catalog: Catalog,
    store: impl KeyValueStore + 'static,
    observer: Arc<RecordingObserver>,
) -> Result<Storefront, ContextError> {
    Storefront::builder()
        .catalog(catalog)
        .store(store)
        .observer(observer)
        .build()
}

/// A persistence failure as seen by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailure {
    pub op: PersistenceOp,
    pub key: String,
    pub message: String,
}

/// Observer that keeps every reported failure.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    failures: Mutex<Vec<RecordedFailure>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the failures reported so far.
    #[must_use]
    pub fn failures(&self) -> Vec<RecordedFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }
}

impl PersistenceObserver for RecordingObserver {
    fn report(&self, failure: &PersistenceFailure<'_>) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(RecordedFailure {
                op: failure.op,
                key: failure.key.to_string(),
                message: failure.error.to_string(),
            });
        }
    }
}
