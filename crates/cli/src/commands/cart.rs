//! Cart commands.
//!
//! Each command applies one intent and renders the resulting cart. The
//! confirmation flag is not persisted, so `confirm` renders the summary in
//! the same invocation and `new-order` empties the stored cart.

use dessert_storefront::Storefront;
use dessert_storefront::view::OrderConfirmationView;

use super::CommandResult;
use crate::render::{self, Format};

/// # Errors
///
/// Returns an error if `name` is not in the catalog.
pub fn add(shop: &mut Storefront, name: &str, format: Format) -> CommandResult {
    if !shop.add_by_name(name) {
        return Err(format!("no dessert named {name:?} in the catalog").into());
    }
    tracing::info!(name, "Added to cart");
    show(shop, format)
}

/// Removing a dessert that is not in the cart leaves it unchanged.
///
/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn remove(shop: &mut Storefront, name: &str, format: Format) -> CommandResult {
    shop.remove(name);
    show(shop, format)
}

/// # Errors
///
/// Returns an error if `name` is not in the cart.
pub fn set_quantity(
    shop: &mut Storefront,
    name: &str,
    quantity: i64,
    format: Format,
) -> CommandResult {
    if shop.cart().line(name).is_none() {
        return Err(format!("{name:?} is not in the cart").into());
    }
    shop.set_quantity(name, quantity);
    show(shop, format)
}

/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn clear(shop: &mut Storefront, format: Format) -> CommandResult {
    shop.clear_cart();
    show(shop, format)
}

/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn show(shop: &Storefront, format: Format) -> CommandResult {
    Ok(render::cart(&shop.cart_view(), format)?)
}

/// # Errors
///
/// Returns an error if the cart is empty.
pub fn confirm(shop: &mut Storefront, format: Format) -> CommandResult {
    if shop.cart().is_empty() {
        return Err("cannot confirm an empty cart".into());
    }
    shop.confirm_order();

    let summary =
        OrderConfirmationView::for_cart(shop.cart()).ok_or("order was not confirmed")?;
    tracing::info!(total = %summary.total, "Order confirmed");
    Ok(render::confirmation(&summary, format)?)
}

/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn new_order(shop: &mut Storefront, format: Format) -> CommandResult {
    shop.start_new_order();
    show(shop, format)
}
