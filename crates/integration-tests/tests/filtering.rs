//! Integration tests for catalog filtering through the storefront.

#![allow(clippy::unwrap_used)]

use dessert_storefront::Storefront;
use dessert_storefront::catalog::Catalog;
use dessert_storefront::filter::{FilterCriteria, parse_max_price, parse_min_price};
use dessert_storefront::persistence::MemoryStore;
use dessert_storefront_integration_tests::{
    RecordingObserver, storefront_with, three_entry_catalog,
};
use rust_decimal::Decimal;

fn shop() -> Storefront {
    storefront_with(
        three_entry_catalog().unwrap(),
        MemoryStore::new(),
        RecordingObserver::new(),
    )
    .unwrap()
}

fn visible(shop: &Storefront) -> Vec<String> {
    shop.filtered()
        .iter()
        .map(|entry| entry.name.to_string())
        .collect()
}

// =============================================================================
// End-to-End Scenario
// =============================================================================

#[test]
fn test_category_then_price_range() {
    let mut shop = shop();

    shop.set_category("Waffle");
    assert_eq!(visible(&shop), vec!["Waffle", "Belgian Waffle"]);
    assert!(shop.filtered().iter().all(|entry| entry.category == "Waffle"));

    shop.set_price_range(Decimal::from(5), Decimal::from(7));
    assert_eq!(visible(&shop), vec!["Waffle"]);
    assert_eq!(shop.view().results_label, "1 dessert found");
}

// =============================================================================
// Criteria Behavior
// =============================================================================

#[test]
fn test_default_criteria_show_full_catalog_in_order() {
    let shop = shop();
    assert_eq!(visible(&shop), vec!["Waffle", "Belgian Waffle", "Red Velvet Cake"]);
    assert!(!shop.has_active_filters());
    assert_eq!(shop.criteria(), &FilterCriteria::default());
}

#[test]
fn test_search_is_case_insensitive_over_name_and_category() {
    let mut shop = shop();

    shop.set_search("WAF");
    assert_eq!(visible(&shop), vec!["Waffle", "Belgian Waffle"]);

    shop.set_search("velvet");
    assert_eq!(visible(&shop), vec!["Red Velvet Cake"]);

    // Matches the "Cake" category as well as the name.
    shop.set_search("cAkE");
    assert_eq!(visible(&shop), vec!["Red Velvet Cake"]);

    shop.set_search("belg");
    assert_eq!(visible(&shop), vec!["Belgian Waffle"]);
}

#[test]
fn test_category_match_is_exact() {
    let mut shop = shop();
    shop.set_category("waffle");
    assert!(visible(&shop).is_empty());
    assert_eq!(shop.view().results_label, "0 desserts found");
}

#[test]
fn test_any_deviation_activates_filters() {
    let mut shop = shop();
    shop.set_search("x");
    assert!(shop.has_active_filters());
    shop.clear_filters();

    shop.set_price_range(Decimal::ZERO, Decimal::from(99));
    assert!(shop.has_active_filters());
    shop.clear_filters();

    shop.toggle_favorites_only();
    assert!(shop.has_active_filters());
    shop.toggle_favorites_only();
    assert!(!shop.has_active_filters());
}

#[test]
fn test_price_inputs_follow_text_field_rules() {
    let mut shop = shop();
    shop.set_price_range(parse_min_price("abc"), parse_max_price("0"));
    assert!(!shop.has_active_filters());
    assert_eq!(visible(&shop).len(), 3);

    shop.set_price_range(parse_min_price("4.75"), parse_max_price(""));
    assert_eq!(visible(&shop), vec!["Waffle", "Belgian Waffle"]);
}

#[test]
fn test_entries_above_default_band_are_hidden() {
    let json = r#"[
      {"image": {"thumbnail": "t", "mobile": "m", "tablet": "t", "desktop": "d"},
       "name": "Wedding Cake", "category": "Cake", "price": 250.0},
      {"image": {"thumbnail": "t", "mobile": "m", "tablet": "t", "desktop": "d"},
       "name": "Cupcake", "category": "Cake", "price": 3.0}
    ]"#;
    let mut shop = storefront_with(
        Catalog::from_json(json).unwrap(),
        MemoryStore::new(),
        RecordingObserver::new(),
    )
    .unwrap();

    assert_eq!(visible(&shop), vec!["Cupcake"]);

    shop.set_price_range(Decimal::ZERO, Decimal::from(300));
    assert_eq!(visible(&shop), vec!["Wedding Cake", "Cupcake"]);
}

#[test]
fn test_favorites_only_combines_with_category() {
    let mut shop = shop();
    shop.toggle_favorite("Red Velvet Cake");
    shop.toggle_favorite("Waffle");
    shop.toggle_favorites_only();
    assert_eq!(visible(&shop), vec!["Waffle", "Red Velvet Cake"]);

    shop.set_category("Cake");
    assert_eq!(visible(&shop), vec!["Red Velvet Cake"]);

    let view = shop.view();
    assert_eq!(view.favorites_count, 2);
    assert!(view.items.iter().all(|item| item.is_favorite));
}
