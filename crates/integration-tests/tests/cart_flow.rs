//! Integration tests for the cart state machine.
//!
//! These drive the cart through the storefront intents and check totals,
//! item counts and the confirmation flag after each step.

#![allow(clippy::unwrap_used)]

use dessert_storefront::cart::{CartAction, CartState};
use dessert_storefront::persistence::MemoryStore;
use dessert_storefront_core::{Price, ProductName};
use dessert_storefront_integration_tests::{
    RecordingObserver, storefront_with, three_entry_catalog,
};

// =============================================================================
// End-to-End Scenarios
// =============================================================================

#[test]
fn test_add_twice_then_remove() {
    let mut shop = storefront_with(
        three_entry_catalog().unwrap(),
        MemoryStore::new(),
        RecordingObserver::new(),
    )
    .unwrap();

    assert!(shop.add_by_name("Waffle"));
    assert!(shop.add_by_name("Waffle"));

    let cart = shop.cart();
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.line("Waffle").unwrap().quantity(), 2);
    assert_eq!(cart.total().to_string(), "$13.00");
    assert_eq!(cart.item_count(), 2);

    shop.remove("Waffle");
    assert!(shop.cart().is_empty());
    assert_eq!(shop.cart().total(), Price::ZERO);
    assert_eq!(shop.cart().item_count(), 0);
}

#[test]
fn test_confirm_keeps_lines_and_new_order_clears() {
    let mut shop = storefront_with(
        three_entry_catalog().unwrap(),
        MemoryStore::new(),
        RecordingObserver::new(),
    )
    .unwrap();
    shop.add_by_name("Red Velvet Cake");
    shop.add_by_name("Belgian Waffle");
    let before = shop.cart().lines().to_vec();

    shop.confirm_order();
    assert!(shop.cart().is_order_confirmed());
    assert_eq!(shop.cart().lines(), before.as_slice());
    assert_eq!(shop.view().confirmation.unwrap().total, "$12.50");

    shop.start_new_order();
    assert!(shop.cart().is_empty());
    assert!(!shop.cart().is_order_confirmed());
}

// =============================================================================
// Reducer Properties
// =============================================================================

#[test]
fn test_sequence_keeps_totals_consistent() {
    let catalog = three_entry_catalog().unwrap();
    let entries = catalog.entries();
    let pick = |index: usize| entries.get(index % entries.len()).unwrap().clone();

    let mut state = CartState::default();
    for step in 0..60_usize {
        let action = match step % 5 {
            0 | 1 => CartAction::Add(pick(step)),
            2 => CartAction::SetQuantity {
                name: pick(step).name,
                quantity: i64::try_from(step % 7).unwrap() - 2,
            },
            3 => CartAction::Remove(pick(step + 1).name),
            _ => CartAction::Remove(ProductName::parse("Not Sold Here").unwrap()),
        };
        state = state.reduce(action);

        let names: Vec<&str> = state.lines().iter().map(|l| l.name().as_str()).collect();
        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), names.len(), "duplicate line at step {step}");

        let recomputed: u64 = state.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(state.item_count(), recomputed);
        assert!(state.total() >= Price::ZERO);
        assert!(state.lines().iter().all(|l| l.quantity() > 0));
    }
}

#[test]
fn test_clear_always_resets() {
    let catalog = three_entry_catalog().unwrap();
    let waffle = catalog.get("Waffle").unwrap().clone();

    for confirmed in [false, true] {
        let mut state = CartState::default().reduce(CartAction::Add(waffle.clone()));
        if confirmed {
            state = state.reduce(CartAction::Confirm);
        }
        let cleared = state.reduce(CartAction::Clear);
        assert_eq!(cleared, CartState::default());
    }
}
