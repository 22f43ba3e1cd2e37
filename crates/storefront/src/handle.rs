//! Single-owner task around a [`Storefront`].
//!
//! When several tasks need to drive the same storefront, it is moved into one
//! owning task and every intent is sent to it over an unbounded channel. The
//! task applies intents strictly in arrival order, which keeps the cart's
//! sequencing guarantees without any locking. Queries reply over a oneshot
//! channel.

use dessert_storefront_core::CatalogEntry;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::debounce::{SearchDebouncer, SearchSink};
use crate::error::ContextError;
use crate::state::Storefront;
use crate::view::ShopView;

/// A user intent, applied by the owning task.
#[derive(Debug)]
pub enum Intent {
    Add(CatalogEntry),
    AddByName(String),
    Remove(String),
    SetQuantity { name: String, quantity: i64 },
    ClearCart,
    ConfirmOrder,
    StartNewOrder,
    ToggleFavorite(String),
    SetSearch(String),
    SetCategory(String),
    SetPriceRange { min: Decimal, max: Decimal },
    ToggleFavoritesOnly,
    ClearFilters,
    /// Render the current view.
    View(oneshot::Sender<ShopView>),
}

impl Intent {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::AddByName(_) => "add_by_name",
            Self::Remove(_) => "remove",
            Self::SetQuantity { .. } => "set_quantity",
            Self::ClearCart => "clear_cart",
            Self::ConfirmOrder => "confirm_order",
            Self::StartNewOrder => "start_new_order",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::SetSearch(_) => "set_search",
            Self::SetCategory(_) => "set_category",
            Self::SetPriceRange { .. } => "set_price_range",
            Self::ToggleFavoritesOnly => "toggle_favorites_only",
            Self::ClearFilters => "clear_filters",
            Self::View(_) => "view",
        }
    }
}

/// Cloneable sender side of the owning task.
#[derive(Debug, Clone)]
pub struct StorefrontHandle {
    tx: mpsc::UnboundedSender<Intent>,
}

/// Move `storefront` into a new task. The task ends, returning the
/// storefront, once every handle has been dropped.
///
/// Persistence runs inline on this task, so a blocking store such as
/// [`FileStore`](crate::persistence::FileStore) blocks its worker thread for
/// the duration of each write. The cart and favorites are a few kilobytes at
/// most; stores with slow writes should hand them off internally.
#[must_use]
pub fn spawn(storefront: Storefront) -> (StorefrontHandle, JoinHandle<Storefront>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(storefront, rx));
    (StorefrontHandle { tx }, task)
}

async fn run(mut storefront: Storefront, mut rx: mpsc::UnboundedReceiver<Intent>) -> Storefront {
    info!("Storefront task started");
    while let Some(intent) = rx.recv().await {
        debug!(intent = intent.kind(), "Applying intent");
        apply(&mut storefront, intent);
    }
    info!("Storefront task stopped");
    storefront
}

fn apply(storefront: &mut Storefront, intent: Intent) {
    match intent {
        Intent::Add(entry) => storefront.add(&entry),
        Intent::AddByName(name) => {
            storefront.add_by_name(&name);
        }
        Intent::Remove(name) => storefront.remove(&name),
        Intent::SetQuantity { name, quantity } => storefront.set_quantity(&name, quantity),
        Intent::ClearCart => storefront.clear_cart(),
        Intent::ConfirmOrder => storefront.confirm_order(),
        Intent::StartNewOrder => storefront.start_new_order(),
        Intent::ToggleFavorite(name) => {
            storefront.toggle_favorite(&name);
        }
        Intent::SetSearch(text) => storefront.set_search(text),
        Intent::SetCategory(category) => storefront.set_category(category),
        Intent::SetPriceRange { min, max } => storefront.set_price_range(min, max),
        Intent::ToggleFavoritesOnly => storefront.toggle_favorites_only(),
        Intent::ClearFilters => storefront.clear_filters(),
        Intent::View(reply) => {
            // The requester may have given up waiting.
            let _ = reply.send(storefront.view());
        }
    }
}

impl StorefrontHandle {
    /// Queue an intent.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Closed`] if the owning task has stopped.
    pub fn send(&self, intent: Intent) -> Result<(), ContextError> {
        self.tx.send(intent).map_err(|_| ContextError::Closed)
    }

    /// Render the view after every intent queued before this call.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Closed`] if the owning task has stopped.
    pub async fn view(&self) -> Result<ShopView, ContextError> {
        let (reply, rx) = oneshot::channel();
        self.send(Intent::View(reply))?;
        rx.await.map_err(|_| ContextError::Closed)
    }

    /// A debouncer whose settled values arrive as [`Intent::SetSearch`].
    ///
    /// Must be called from within a `tokio` runtime.
    #[must_use]
    pub fn search_debouncer(&self, window: std::time::Duration) -> SearchDebouncer {
        let tx = self.tx.clone();
        let sink: SearchSink = std::sync::Arc::new(move |text| {
            if tx.send(Intent::SetSearch(text)).is_err() {
                debug!("Search value dropped, storefront task stopped");
            }
        });
        SearchDebouncer::new(window, sink)
    }
}
