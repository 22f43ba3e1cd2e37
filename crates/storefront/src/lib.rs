//! Dessert Storefront engine.
//!
//! The state behind the storefront UI: an immutable catalog, a filter engine
//! over it, the cart state machine, the favorites set, and the persistence
//! bridge that keeps cart and favorites in durable key-value storage.
//!
//! # Architecture
//!
//! - [`state::Storefront`] is the application root, built once and passed to
//!   every consumer; no ambient or global state
//! - [`cart::CartState::reduce`] is a pure reducer over [`cart::CartAction`]
//! - [`filter`] is a pure, memoizable transformation of the catalog
//! - [`persistence`] writes synchronously after each change and reports
//!   failures to an observer instead of returning them
//! - [`handle`] serializes intents from many tasks through one owner
//! - [`debounce`] delays search input until typing pauses
//!
//! # Example
//!
//! ```rust
//! use dessert_storefront::catalog::Catalog;
//! use dessert_storefront::persistence::MemoryStore;
//! use dessert_storefront::state::Storefront;
//!
//! let mut shop = Storefront::builder()
//!     .catalog(Catalog::bundled()?)
//!     .store(MemoryStore::new())
//!     .build()?;
//!
//! shop.add_by_name("Waffle with Berries");
//! shop.add_by_name("Waffle with Berries");
//! assert_eq!(shop.cart_view().total, "$13.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod handle;
pub mod persistence;
pub mod state;
pub mod view;

pub use error::{ContextError, Result, StorefrontError};
pub use state::{Storefront, StorefrontBuilder};
