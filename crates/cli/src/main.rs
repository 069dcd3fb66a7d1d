//! Al-Fath CLI - browse the catalog, manage the cart and wishlist, check out.
//!
//! # Usage
//!
//! ```bash
//! # List cleaners, cheapest first
//! alfath products --category منظفات --sort price-low
//!
//! # Add two units of product 1 to the cart and review it
//! alfath cart add 1 --quantity 2
//! alfath cart show
//!
//! # Place a cash-on-delivery order
//! alfath checkout --name "أحمد علي" --phone 01012345678 --address "15 شارع النيل" --city القاهرة
//! ```
//!
//! The cart and wishlist persist between invocations under `ALFATH_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use alfath_core::ProductId;
use alfath_storefront::account::SignupForm;
use alfath_storefront::catalog::{ProductQuery, SortKey};
use alfath_storefront::checkout::DeliveryInfo;
use alfath_storefront::config::StorefrontConfig;
use alfath_storefront::error::AppError;
use alfath_storefront::state::AppState;
use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(name = "alfath")]
#[command(author, version, about = "Al-Fath storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Filters shared by product listings.
#[derive(Args, Debug)]
struct ListingArgs {
    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// Only products in this subcategory
    #[arg(long)]
    subcategory: Option<String>,

    /// Case-insensitive text search over name, description and brand
    #[arg(long)]
    search: Option<String>,

    /// Sort order (`price-low`, `price-high`, `rating`, `name`, `newest`)
    #[arg(long)]
    sort: Option<SortKey>,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products(ListingArgs),
    /// Show one product
    Product {
        /// Product id
        id: ProductId,
    },
    /// List categories with their subcategories
    Categories {
        /// Only categories whose name or description contains this
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Featured products
    Featured(ListingArgs),
    /// Best-selling products
    Bestsellers(ListingArgs),
    /// Products on sale
    OnSale(ListingArgs),
    /// Search the catalog
    Search {
        /// Search term
        query: String,
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
    /// Place a cash-on-delivery order for the cart
    Checkout {
        /// Recipient full name
        #[arg(long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        postal_code: Option<String>,

        /// Delivery notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,

        /// Email address or phone number
        #[arg(short, long)]
        contact: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm_password: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add {
        id: ProductId,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Set a product's quantity (0 removes it)
    Set { id: ProductId, quantity: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { id: ProductId },
    /// Remove a saved product
    Remove { id: ProductId },
    /// Save a product, or remove it if already saved
    Toggle { id: ProductId },
    /// Remove every saved product
    Clear,
    /// Add every in-stock saved product to the cart
    ToCart,
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
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "alfath_storefront=info,alfath_cli=info".into());

    // Logs go to stderr so command output on stdout stays clean
    let is_json = std::env::var("ALFATH_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            report(&CliError::App(e.into()));
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result = match AppState::new(config) {
        Ok(state) => run(cli, &state).await,
        Err(e) => Err(CliError::App(e.into())),
    };

    if let Err(e) = result {
        report(&e);
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn report(err: &CliError) {
    let message = match err {
        CliError::App(app) => {
            app.capture();
            app.user_message()
        }
        CliError::Output(io) => {
            tracing::error!(error = %io, "Command failed");
            return;
        }
    };
    let _ = writeln!(std::io::stderr().lock(), "{message}");
}

async fn run(cli: Cli, state: &AppState) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Products(args) => {
            commands::catalog::products(state, &mut out, &args.into_query()).await?;
        }
        Commands::Product { id } => commands::catalog::product(state, &mut out, id).await?,
        Commands::Categories { search } => {
            commands::catalog::categories(state, &mut out, &search).await?;
        }
        Commands::Featured(args) => {
            let listing = state.catalog().featured().await;
            commands::catalog::print_listing(&mut out, listing, &args.into_query())?;
        }
        Commands::Bestsellers(args) => {
            let listing = state.catalog().best_sellers().await;
            commands::catalog::print_listing(&mut out, listing, &args.into_query())?;
        }
        Commands::OnSale(args) => {
            let listing = state.catalog().on_sale().await;
            commands::catalog::print_listing(&mut out, listing, &args.into_query())?;
        }
        Commands::Search { query } => {
            let listing = state.catalog().search(&query).await;
            commands::catalog::print_listing(&mut out, listing, &ProductQuery::new())?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state, &mut out)?,
            CartAction::Add { id, quantity } => {
                commands::cart::add(state, &mut out, id, quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(state, &mut out, id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(state, &mut out, id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(state, &mut out)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(state, &mut out)?,
            WishlistAction::Add { id } => commands::wishlist::add(state, &mut out, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(state, &mut out, id)?,
            WishlistAction::Toggle { id } => {
                commands::wishlist::toggle(state, &mut out, id).await?;
            }
            WishlistAction::Clear => commands::wishlist::clear(state, &mut out)?,
            WishlistAction::ToCart => commands::wishlist::to_cart(state, &mut out)?,
        },
        Commands::Checkout {
            name,
            phone,
            address,
            city,
            postal_code,
            notes,
        } => {
            let info = DeliveryInfo {
                full_name: name,
                phone,
                address,
                city,
                postal_code,
                notes,
            };
            commands::checkout::checkout(state, &mut out, &info).await?;
        }
        Commands::Signup {
            username,
            contact,
            password,
            confirm_password,
        } => {
            let form = SignupForm {
                username,
                contact,
                password: password.into(),
                confirm_password: confirm_password.into(),
            };
            commands::signup::signup(state, &mut out, &form).await?;
        }
    }

    out.flush()?;
    Ok(())
}

impl ListingArgs {
    fn into_query(self) -> ProductQuery {
        ProductQuery {
            category: self.category,
            subcategory: self.subcategory,
            search: self.search,
            sort: self.sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["alfath", "cart", "add", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 1, .. }
            }
        ));
    }

    #[test]
    fn test_cart_add_rejects_zero_quantity() {
        let result = Cli::try_parse_from(["alfath", "cart", "add", "1", "--quantity", "0"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["alfath", "cart", "add", "1", "-q", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 3, .. }
            }
        ));
    }

    #[test]
    fn test_listing_sort_parses() {
        let cli = Cli::try_parse_from(["alfath", "products", "--sort", "price-low"]).unwrap();
        let Commands::Products(args) = cli.command else {
            panic!("expected products command");
        };
        assert_eq!(args.into_query().sort, Some(SortKey::PriceLow));
        assert!(Cli::try_parse_from(["alfath", "products", "--sort", "cheap"]).is_err());
    }
}
