//! Dessert CLI - Terminal front-end for the dessert storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! dessert list --category Waffle --max 7
//!
//! # Manage the cart
//! dessert add "Waffle with Berries"
//! dessert set "Waffle with Berries" 3
//! dessert cart
//!
//! # Place the order, then start a new one
//! dessert confirm
//! dessert new-order
//!
//! # Interactive session with debounced search
//! dessert shell
//! ```
//!
//! # Commands
//!
//! - `list` / `categories` - Browse and filter the catalog
//! - `add` / `remove` / `set` / `clear` / `cart` - Cart operations
//! - `confirm` / `new-order` - Order confirmation flow
//! - `favorite` - Toggle a favorite
//! - `shell` - Read intents line by line from stdin
//!
//! Cart and favorites persist between invocations in `DESSERT_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use dessert_storefront::Storefront;
use dessert_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "dessert")]
#[command(author, version, about = "Dessert storefront in the terminal")]
struct Cli {
    /// Print JSON view models instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List desserts matching the filters
    List(commands::catalog::ListArgs),
    /// List categories
    Categories,
    /// Add one unit of a dessert to the cart
    Add {
        /// Dessert name
        name: String,
    },
    /// Remove a dessert from the cart
    Remove {
        /// Dessert name
        name: String,
    },
    /// Set the quantity of a dessert already in the cart (0 removes it)
    Set {
        /// Dessert name
        name: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show the cart
    Cart,
    /// Confirm the order and show the summary
    Confirm,
    /// Start a new order (empties the cart)
    NewOrder,
    /// Toggle a dessert as favorite
    Favorite {
        /// Dessert name
        name: String,
    },
    /// Interactive session reading one intent per line
    Shell,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let sentry_config = config.sentry.as_ref()?;

    let guard = sentry::init((
        sentry_config.dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: sentry_config
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: sentry_config.sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet.
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so stdout stays clean for rendered output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dessert_storefront=warn,dessert=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = Storefront::from_config(config)?;
    let format = render::Format::from_json_flag(cli.json);

    let output = match cli.command {
        Commands::List(args) => commands::catalog::list(&mut shop, &args, format)?,
        Commands::Categories => commands::catalog::categories(&shop, format)?,
        Commands::Add { name } => commands::cart::add(&mut shop, &name, format)?,
        Commands::Remove { name } => commands::cart::remove(&mut shop, &name, format)?,
        Commands::Set { name, quantity } => {
            commands::cart::set_quantity(&mut shop, &name, quantity, format)?
        }
        Commands::Clear => commands::cart::clear(&mut shop, format)?,
        Commands::Cart => commands::cart::show(&shop, format)?,
        Commands::Confirm => commands::cart::confirm(&mut shop, format)?,
        Commands::NewOrder => commands::cart::new_order(&mut shop, format)?,
        Commands::Favorite { name } => commands::favorites::toggle(&mut shop, &name)?,
        Commands::Shell => {
            commands::shell::run(shop, format).await?;
            return Ok(());
        }
    };

    render::emit(&output);
    Ok(())
}
