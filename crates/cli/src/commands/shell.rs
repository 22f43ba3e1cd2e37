//! Interactive session.
//!
//! The storefront is moved into its owning task and every line read from
//! stdin becomes an intent. Search input goes through the debouncer, so a
//! `list` typed right after `search` still shows the previous results until
//! the window has elapsed.

use dessert_storefront::Storefront;
use dessert_storefront::debounce::SearchDebouncer;
use dessert_storefront::filter::{parse_max_price, parse_min_price};
use dessert_storefront::handle::{self, Intent, StorefrontHandle};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{self, Format};

const HELP: &str = "\
Commands:
  list                     show desserts matching the filters
  search <text>            set the search text (debounced)
  clear-search             clear the search text immediately
  category <name>          filter by category (All for every category)
  price <min> <max>        filter by price band
  favorites-only           toggle the favorites-only filter
  clear-filters            reset every filter
  add <name>               add one unit to the cart
  remove <name>            remove a dessert from the cart
  set <quantity> <name>    set the quantity of a dessert in the cart
  clear                    empty the cart
  cart                     show the cart
  confirm                  confirm the order
  new-order                start a new order
  favorite <name>          toggle a favorite
  help                     show this help
  quit                     leave the session";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Search(String),
    ClearSearch,
    Category(String),
    Price { min: String, max: String },
    FavoritesOnly,
    ClearFilters,
    Add(String),
    Remove(String),
    Set { quantity: i64, name: String },
    Clear,
    Cart,
    Confirm,
    NewOrder,
    Favorite(String),
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim_end();

    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("{word} needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word {
        "list" | "ls" => Command::List,
        // Search text is passed through untrimmed on the left.
        "search" => Command::Search(rest.to_string()),
        "clear-search" => Command::ClearSearch,
        "category" => Command::Category(required("a category")?),
        "price" => {
            let mut bounds = rest.split_whitespace();
            let min = bounds.next().unwrap_or_default().to_string();
            let max = bounds.next().unwrap_or_default().to_string();
            Command::Price { min, max }
        }
        "favorites-only" => Command::FavoritesOnly,
        "clear-filters" => Command::ClearFilters,
        "add" => Command::Add(required("a dessert name")?),
        "remove" => Command::Remove(required("a dessert name")?),
        "set" => {
            let (quantity, name) = rest
                .split_once(' ')
                .ok_or_else(|| "usage: set <quantity> <name>".to_string())?;
            let quantity = quantity
                .parse()
                .map_err(|_| format!("invalid quantity {quantity:?}"))?;
            Command::Set {
                quantity,
                name: name.trim().to_string(),
            }
        }
        "clear" => Command::Clear,
        "cart" => Command::Cart,
        "confirm" => Command::Confirm,
        "new-order" => Command::NewOrder,
        "favorite" | "fav" => Command::Favorite(required("a dessert name")?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try help")),
    };
    Ok(command)
}

/// Run the session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the storefront task stops.
pub async fn run(shop: Storefront, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let window = shop.search_debounce();
    let (handle, task) = handle::spawn(shop);
    let mut debouncer = handle.search_debouncer(window);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                render::emit(&message);
                continue;
            }
        };
        if let Some(output) = execute(&handle, &mut debouncer, command, format).await? {
            render::emit(&output);
        }
    }

    // Pending search input is discarded, as when the page is left.
    drop(debouncer);
    drop(handle);
    task.await?;
    tracing::info!("Shell session ended");
    Ok(())
}

async fn execute(
    handle: &StorefrontHandle,
    debouncer: &mut SearchDebouncer,
    command: Command,
    format: Format,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let output = match command {
        Command::List => Some(render::catalog(&handle.view().await?, format)?),
        Command::Search(text) => {
            debouncer.input(text);
            None
        }
        Command::ClearSearch => {
            debouncer.flush_now(String::new());
            None
        }
        Command::Category(category) => {
            handle.send(Intent::SetCategory(category))?;
            None
        }
        Command::Price { min, max } => {
            handle.send(Intent::SetPriceRange {
                min: parse_min_price(&min),
                max: parse_max_price(&max),
            })?;
            None
        }
        Command::FavoritesOnly => {
            handle.send(Intent::ToggleFavoritesOnly)?;
            None
        }
        Command::ClearFilters => {
            debouncer.cancel();
            handle.send(Intent::ClearFilters)?;
            None
        }
        Command::Add(name) => {
            handle.send(Intent::AddByName(name))?;
            Some(cart(handle, format).await?)
        }
        Command::Remove(name) => {
            handle.send(Intent::Remove(name))?;
            Some(cart(handle, format).await?)
        }
        Command::Set { quantity, name } => {
            handle.send(Intent::SetQuantity { name, quantity })?;
            Some(cart(handle, format).await?)
        }
        Command::Clear => {
            handle.send(Intent::ClearCart)?;
            Some(cart(handle, format).await?)
        }
        Command::Cart => Some(cart(handle, format).await?),
        Command::Confirm => {
            if handle.view().await?.cart.is_empty {
                return Ok(Some("Your cart is empty".to_string()));
            }
            handle.send(Intent::ConfirmOrder)?;
            match handle.view().await?.confirmation {
                Some(summary) => Some(render::confirmation(&summary, format)?),
                None => None,
            }
        }
        Command::NewOrder => {
            handle.send(Intent::StartNewOrder)?;
            Some(cart(handle, format).await?)
        }
        Command::Favorite(name) => {
            handle.send(Intent::ToggleFavorite(name))?;
            let view = handle.view().await?;
            Some(format!("{} favorites", view.favorites_count))
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => None,
    };
    Ok(output)
}

async fn cart(
    handle: &StorefrontHandle,
    format: Format,
) -> Result<String, Box<dyn std::error::Error>> {
    let view = handle.view().await?;
    Ok(render::cart(&view.cart, format)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use dessert_storefront::catalog::Catalog;
    use dessert_storefront::persistence::MemoryStore;

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("list").unwrap(), Command::List);
        assert_eq!(
            parse("search  cake").unwrap(),
            Command::Search(" cake".to_string())
        );
        assert_eq!(parse("search").unwrap(), Command::Search(String::new()));
        assert_eq!(
            parse("add Red Velvet Cake").unwrap(),
            Command::Add("Red Velvet Cake".to_string())
        );
        assert_eq!(
            parse("set -2 Red Velvet Cake").unwrap(),
            Command::Set {
                quantity: -2,
                name: "Red Velvet Cake".to_string()
            }
        );
        assert_eq!(
            parse("price 5").unwrap(),
            Command::Price {
                min: "5".to_string(),
                max: String::new()
            }
        );
        assert_eq!(parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("add").unwrap_err().contains("dessert name"));
        assert!(parse("set x Waffle").unwrap_err().contains("invalid quantity"));
        assert!(parse("set 3").unwrap_err().starts_with("usage"));
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_debounces_search() {
        let shop = Storefront::builder()
            .catalog(Catalog::bundled().unwrap())
            .store(MemoryStore::new())
            .build()
            .unwrap();
        let (handle, _task) = handle::spawn(shop);
        let mut debouncer = handle.search_debouncer(Duration::from_millis(300));

        for line in ["search b", "search br", "search brownie"] {
            let out = execute(&handle, &mut debouncer, parse(line).unwrap(), Format::Text)
                .await
                .unwrap();
            assert!(out.is_none());
        }

        let out = execute(&handle, &mut debouncer, Command::List, Format::Text)
            .await
            .unwrap()
            .unwrap();
        assert!(out.starts_with("9 desserts found"));

        tokio::time::advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;

        let out = execute(&handle, &mut debouncer, Command::List, Format::Text)
            .await
            .unwrap()
            .unwrap();
        assert!(out.starts_with("1 dessert found (filters active)"));
        assert!(out.contains("Salted Caramel Brownie"));
    }

    #[tokio::test]
    async fn test_session_cart_flow() {
        let shop = Storefront::builder()
            .catalog(Catalog::bundled().unwrap())
            .store(MemoryStore::new())
            .build()
            .unwrap();
        let (handle, _task) = handle::spawn(shop);
        let mut debouncer = handle.search_debouncer(Duration::from_millis(300));

        let out = execute(&handle, &mut debouncer, Command::Confirm, Format::Text)
            .await
            .unwrap();
        assert_eq!(out.as_deref(), Some("Your cart is empty"));

        execute(
            &handle,
            &mut debouncer,
            parse("add Waffle with Berries").unwrap(),
            Format::Text,
        )
        .await
        .unwrap();
        let out = execute(
            &handle,
            &mut debouncer,
            parse("set 2 Waffle with Berries").unwrap(),
            Format::Text,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(out.ends_with("Order Total $13.00"));

        let out = execute(&handle, &mut debouncer, Command::Confirm, Format::Text)
            .await
            .unwrap()
            .unwrap();
        assert!(out.starts_with("Order Confirmed"));

        let out = execute(&handle, &mut debouncer, Command::NewOrder, Format::Text)
            .await
            .unwrap()
            .unwrap();
        assert!(out.starts_with("Your Cart (0)"));
    }
}
