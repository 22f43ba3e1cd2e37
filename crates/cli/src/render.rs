//! Text and JSON rendering of storefront view models.

use std::fmt::Write as _;

use dessert_storefront::view::{CartView, CatalogItemView, OrderConfirmationView, ShopView};
use serde::Serialize;

/// Output format selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Rendering only fails when JSON serialization does.
pub type RenderResult = Result<String, serde_json::Error>;

/// Write rendered output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}

fn json<T: Serialize>(value: &T) -> RenderResult {
    serde_json::to_string_pretty(value)
}

/// The filtered catalog with cart and favorite markers.
pub fn catalog(view: &ShopView, format: Format) -> RenderResult {
    if format == Format::Json {
        return json(view);
    }

    let mut out = String::new();
    let _ = write!(out, "{}", view.results_label);
    if view.has_active_filters {
        out.push_str(" (filters active)");
    }
    for item in &view.items {
        out.push('\n');
        out.push_str(&catalog_row(item));
    }
    if view.items.is_empty() {
        out.push_str("\nTry adjusting your search or filters to find what you're looking for.");
    }
    Ok(out)
}

fn catalog_row(item: &CatalogItemView) -> String {
    let favorite = if item.is_favorite { "♥" } else { " " };
    let in_cart = item
        .quantity
        .map(|quantity| format!("  in cart ×{quantity}"))
        .unwrap_or_default();
    format!(
        "{favorite} {:<28} {:<14} {:>7}{in_cart}",
        item.entry.name.as_str(),
        item.entry.category,
        item.price
    )
}

pub fn categories(categories: &[String], format: Format) -> RenderResult {
    if format == Format::Json {
        return json(&categories);
    }
    Ok(categories.join("\n"))
}

pub fn cart(view: &CartView, format: Format) -> RenderResult {
    if format == Format::Json {
        return json(view);
    }
    if view.is_empty {
        return Ok("Your Cart (0)\nYour added items will appear here".to_string());
    }

    let mut out = format!("Your Cart ({})", view.item_count);
    for line in &view.lines {
        let _ = write!(
            out,
            "\n  {:<28} {:>3}x @ {:>7}  {:>8}",
            line.name, line.quantity, line.unit_price, line.line_total
        );
    }
    let _ = write!(out, "\nOrder Total {}", view.total);
    Ok(out)
}

pub fn confirmation(view: &OrderConfirmationView, format: Format) -> RenderResult {
    if format == Format::Json {
        return json(view);
    }

    let mut out = String::from("Order Confirmed\nWe hope you enjoy your food!");
    for line in &view.lines {
        let _ = write!(
            out,
            "\n  {:<28} {:>3}x @ {:>7}  {:>8}",
            line.name, line.quantity, line.unit_price, line.line_total
        );
    }
    let _ = write!(out, "\nOrder Total {}", view.total);
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dessert_storefront::catalog::Catalog;
    use dessert_storefront::persistence::MemoryStore;
    use dessert_storefront::state::Storefront;

    use super::*;

    fn shop() -> Storefront {
        Storefront::builder()
            .catalog(Catalog::bundled().unwrap())
            .store(MemoryStore::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog_text_marks_cart_and_favorites() {
        let mut shop = shop();
        shop.add_by_name("Classic Tiramisu");
        shop.toggle_favorite("Classic Tiramisu");
        shop.set_search("tira");

        let text = catalog(&shop.view(), Format::Text).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("1 dessert found (filters active)"));
        let row = lines.next().unwrap();
        assert!(row.starts_with('♥'));
        assert!(row.contains("Classic Tiramisu"));
        assert!(row.contains("$5.50"));
        assert!(row.ends_with("in cart ×1"));
    }

    #[test]
    fn test_catalog_text_empty_result() {
        let mut shop = shop();
        shop.set_search("zzz");
        let text = catalog(&shop.view(), Format::Text).unwrap();
        assert!(text.starts_with("0 desserts found (filters active)"));
        assert!(text.contains("Try adjusting"));
    }

    #[test]
    fn test_cart_text() {
        let mut shop = shop();
        assert!(cart(&shop.cart_view(), Format::Text).unwrap().starts_with("Your Cart (0)"));

        shop.add_by_name("Waffle with Berries");
        shop.add_by_name("Waffle with Berries");
        let text = cart(&shop.cart_view(), Format::Text).unwrap();
        assert!(text.starts_with("Your Cart (2)"));
        assert!(text.contains("$13.00"));
        assert!(text.ends_with("Order Total $13.00"));
    }

    #[test]
    fn test_cart_json() {
        let mut shop = shop();
        shop.add_by_name("Pistachio Baklava");
        let text = cart(&shop.cart_view(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["item_count"], 1);
        assert_eq!(value["total"], "$4.00");
    }
}
