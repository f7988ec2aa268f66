//! TechSphere CLI - drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! techsphere catalog list --category notebooks --sort price_asc
//!
//! # Work with the cart
//! techsphere cart add 4 --quantity 2
//! techsphere cart update 4 -1
//! techsphere cart show
//!
//! # Ask the assistant
//! techsphere ask "Qual notebook tem mais estoque?"
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, search and inspect products
//! - `cart` - Show and mutate the persisted cart
//! - `wishlist` - Toggle and show wishlisted products
//! - `stock` - Update stock on the catalog service
//! - `ask` / `chat` - Talk to the shopping assistant

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techsphere_core::{Category, ProductId};
use techsphere_storefront::catalog::SortOrder;
use techsphere_storefront::config::StorefrontConfig;
use techsphere_storefront::state::AppState;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "techsphere")]
#[command(author, version, about = "TechSphere storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Update stock on the catalog service
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Ask the shopping assistant a single question
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Start an interactive chat with the shopping assistant
    Chat,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this category (e.g. `notebooks`, `tv_monitors`)
        #[arg(short, long)]
        category: Option<Category>,

        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order (`default`, `price_asc`, `price_desc`, `rating`)
        #[arg(long, default_value = "default")]
        sort: SortOrder,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Change a line's quantity by a signed delta
    Update {
        /// Product ID
        id: ProductId,

        /// Quantity change, e.g. `1` or `-1`
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlisted products
    Show,
    /// Add or remove a product
    Toggle {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Set a product's available stock
    Set {
        /// Product ID
        id: ProductId,

        /// New stock level
        stock: u32,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Failed to load configuration: {e}");
            return ExitCode::from(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "techsphere_storefront=info,techsphere_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = AppState::new(config);

    match run(cli, &state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            let _ = writeln!(std::io::stderr(), "{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
            } => commands::catalog::list(state, category, search, sort).await?,
            CatalogAction::Show { id } => commands::catalog::show(state, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state)?,
            CartAction::Add { id, quantity } => commands::cart::add(state, &id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(state, &id)?,
            CartAction::Update { id, delta } => commands::cart::update(state, &id, delta).await?,
            CartAction::Clear => commands::cart::clear(state)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(state).await?,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(state, &id)?,
        },
        Commands::Stock { action } => match action {
            StockAction::Set { id, stock } => commands::catalog::set_stock(state, &id, stock).await?,
        },
        Commands::Ask { message } => commands::assistant::ask(state, &message.join(" ")).await?,
        Commands::Chat => commands::assistant::chat(state).await?,
    }
    Ok(())
}
