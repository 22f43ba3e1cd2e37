//! Cart state machine.
//!
//! All cart mutations go through [`CartState::reduce`], a pure transition
//! function over a closed set of [`CartAction`]s. [`CartStore`] owns the
//! current state and persists the line sequence whenever it changes.
//!
//! The reducer never fails. Non-positive quantities are normalized to a
//! removal, and actions naming a product that is not in the cart are no-ops.

use std::num::NonZeroU32;

use dessert_storefront_core::{CartLine, CatalogEntry, Price, ProductName};
use tracing::{debug, instrument};

use crate::persistence::PersistenceBridge;

/// A cart transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit, appending a new line if the product is not in the cart.
    Add(CatalogEntry),
    /// Delete the line for a product.
    Remove(ProductName),
    /// Replace a line's quantity. Zero or below removes the line; an unknown
    /// product is ignored.
    SetQuantity { name: ProductName, quantity: i64 },
    /// Empty the cart and hide the order confirmation.
    Clear,
    /// Show the order confirmation. Cart contents are unchanged.
    Confirm,
    /// Replace all lines with previously persisted ones.
    Load(Vec<CartLine>),
}

impl CartAction {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::SetQuantity { .. } => "set_quantity",
            Self::Clear => "clear",
            Self::Confirm => "confirm",
            Self::Load(_) => "load",
        }
    }
}

/// Cart lines in display order plus the order-confirmed flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    order_confirmed: bool,
}

impl CartState {
    /// Apply one action and return the next state.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(entry) => {
                if let Some(line) = self.line_mut(&entry.name) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    self.lines.push(CartLine::new(entry));
                }
            }
            CartAction::Remove(name) => self.remove_line(&name),
            CartAction::SetQuantity { name, quantity } => match positive_quantity(quantity) {
                Some(quantity) => {
                    if let Some(line) = self.line_mut(&name) {
                        line.quantity = quantity;
                    }
                }
                None => self.remove_line(&name),
            },
            CartAction::Clear => {
                self.lines.clear();
                self.order_confirmed = false;
            }
            CartAction::Confirm => self.order_confirmed = true,
            CartAction::Load(lines) => self.lines = merge_duplicate_lines(lines),
        }
        self
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if it is in the cart.
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.entry.name == name)
    }

    #[must_use]
    pub const fn is_order_confirmed(&self) -> bool {
        self.order_confirmed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    fn line_mut(&mut self, name: &ProductName) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.entry.name == name)
    }

    fn remove_line(&mut self, name: &ProductName) {
        self.lines.retain(|line| &line.entry.name != name);
    }
}

/// Clamp a UI quantity into a line quantity. `None` means "remove".
fn positive_quantity(quantity: i64) -> Option<NonZeroU32> {
    if quantity <= 0 {
        return None;
    }
    let clamped = u32::try_from(quantity).unwrap_or(u32::MAX);
    NonZeroU32::new(clamped)
}

/// Fold repeated names into the first occurrence, summing quantities.
fn merge_duplicate_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(existing) = merged.iter_mut().find(|m| m.entry.name == line.entry.name) {
            existing.quantity = existing.quantity.saturating_add(line.quantity.get());
        } else {
            merged.push(line);
        }
    }
    merged
}

/// Owner of the live cart state.
///
/// Every dispatched action is applied through the reducer; when the line
/// sequence changes, the new lines are written through the persistence bridge
/// before `dispatch` returns. Write failures are reported to the bridge's
/// observer and never surface here.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    persistence: PersistenceBridge,
    key: String,
}

impl CartStore {
    /// Open the cart, restoring persisted lines.
    ///
    /// A `Load` action is issued only when storage holds at least one line.
    #[instrument(skip(persistence))]
    pub fn open(persistence: PersistenceBridge, key: &str) -> Self {
        let stored: Vec<CartLine> = persistence.load(key);
        let mut store = Self {
            state: CartState::default(),
            persistence,
            key: key.to_owned(),
        };
        if !stored.is_empty() {
            store.dispatch(CartAction::Load(stored));
        }
        debug!(lines = store.state.lines.len(), "Cart opened");
        store
    }

    /// Apply an action, persisting the lines if they changed.
    pub fn dispatch(&mut self, action: CartAction) {
        let kind = action.kind();
        let next = self.state.clone().reduce(action);
        let lines_changed = next.lines != self.state.lines;
        self.state = next;

        debug!(
            action = kind,
            lines = self.state.lines.len(),
            confirmed = self.state.order_confirmed,
            "Cart action applied"
        );

        if lines_changed {
            self.persistence.save(&self.key, &self.state.lines);
        }
    }

    pub fn add(&mut self, entry: CatalogEntry) {
        self.dispatch(CartAction::Add(entry));
    }

    pub fn remove(&mut self, name: ProductName) {
        self.dispatch(CartAction::Remove(name));
    }

    pub fn set_quantity(&mut self, name: ProductName, quantity: i64) {
        self.dispatch(CartAction::SetQuantity { name, quantity });
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    pub fn confirm(&mut self) {
        self.dispatch(CartAction::Confirm);
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }
}
