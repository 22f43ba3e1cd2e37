//! Catalog browsing.

use clap::Args;
use dessert_storefront::Storefront;
use dessert_storefront::filter::{ALL_CATEGORIES, parse_max_price, parse_min_price};

use super::CommandResult;
use crate::render::{self, Format};

/// Filters for `dessert list`.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Match name or category, case-insensitive
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only this category
    #[arg(long, short, default_value = ALL_CATEGORIES)]
    pub category: String,

    /// Minimum price (unparsable values mean 0)
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<String>,

    /// Maximum price (empty, 0 or unparsable values mean 100)
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<String>,

    /// Only favorites
    #[arg(long, short)]
    pub favorites: bool,
}

/// Apply `args` as the filter selection and render the visible entries.
///
/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn list(shop: &mut Storefront, args: &ListArgs, format: Format) -> CommandResult {
    if let Some(search) = &args.search {
        shop.set_search(search.as_str());
    }
    shop.set_category(args.category.as_str());

    let criteria = shop.criteria();
    let min = args.min.as_deref().map_or(criteria.min_price, parse_min_price);
    let max = args.max.as_deref().map_or(criteria.max_price, parse_max_price);
    shop.set_price_range(min, max);

    if args.favorites {
        shop.toggle_favorites_only();
    }

    tracing::debug!(criteria = ?shop.criteria(), "Listing catalog");
    Ok(render::catalog(&shop.view(), format)?)
}

/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn categories(shop: &Storefront, format: Format) -> CommandResult {
    Ok(render::categories(&shop.categories(), format)?)
}
