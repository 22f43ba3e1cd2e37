//! View models handed to the presentation layer.
//!
//! Prices are preformatted (`$6.50`) so renderers never do arithmetic.

use dessert_storefront_core::{CartLine, CatalogEntry, Price};
use serde::Serialize;

use crate::cart::CartState;
use crate::favorites::FavoritesStore;
use crate::filter::FilterCriteria;

/// One visible catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItemView {
    pub entry: CatalogEntry,
    pub price: String,
    pub in_cart: bool,
    /// Quantity in the cart, when `in_cart`.
    pub quantity: Option<u32>,
    pub is_favorite: bool,
}

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub name: String,
    pub category: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.entry.name.to_string(),
            category: line.entry.category.clone(),
            thumbnail: line.entry.image.thumbnail.clone(),
            quantity: line.quantity(),
            unit_price: line.entry.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart sidebar contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub total_amount: Price,
    pub item_count: u64,
    pub is_empty: bool,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&CartState::default())
    }
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        let total = cart.total();
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: total.to_string(),
            total_amount: total,
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Summary shown once the order is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmationView {
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl OrderConfirmationView {
    /// The confirmation summary, or `None` while the order is unconfirmed.
    #[must_use]
    pub fn for_cart(cart: &CartState) -> Option<Self> {
        cart.is_order_confirmed().then(|| Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().to_string(),
        })
    }
}

/// Everything a full render needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopView {
    pub items: Vec<CatalogItemView>,
    pub results_label: String,
    pub categories: Vec<String>,
    pub criteria: FilterCriteria,
    pub has_active_filters: bool,
    pub favorites_count: usize,
    pub cart: CartView,
    pub order_confirmed: bool,
    pub confirmation: Option<OrderConfirmationView>,
}

/// Pair each visible entry with its cart membership and favorite flag.
#[must_use]
pub fn compose_items(
    visible: &[&CatalogEntry],
    cart: &CartState,
    favorites: &FavoritesStore,
) -> Vec<CatalogItemView> {
    visible
        .iter()
        .map(|&entry| {
            let quantity = cart.line(entry.name.as_str()).map(CartLine::quantity);
            CatalogItemView {
                entry: entry.clone(),
                price: entry.price.to_string(),
                in_cart: quantity.is_some(),
                quantity,
                is_favorite: favorites.is_favorite(entry.name.as_str()),
            }
        })
        .collect()
}
