//! Favorite toggling.

use dessert_storefront::Storefront;

use super::CommandResult;

/// Toggle `name` and report its new state.
///
/// # Errors
///
/// Returns an error if `name` is not in the catalog.
pub fn toggle(shop: &mut Storefront, name: &str) -> CommandResult {
    if shop.catalog().get(name).is_none() {
        return Err(format!("no dessert named {name:?} in the catalog").into());
    }

    let message = if shop.toggle_favorite(name) {
        format!("♥ {name} added to favorites ({})", shop.favorites().count())
    } else {
        format!("{name} removed from favorites ({})", shop.favorites().count())
    };
    Ok(message)
}
