//! Webshop CLI - Terminal front end for the webshop client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (no login needed)
//! shopctl products
//! shopctl search --gender Women --category 2 --availability in_stock
//! shopctl product 14
//!
//! # Buy two of product 1 and one of product 3
//! shopctl buy --item 1:2 --item 3
//!
//! # Admin reads
//! shopctl reports
//! shopctl top-selling --limit 5
//! shopctl earnings --date 2024-03-01
//! shopctl users
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_API_URL` - Backend API base URL
//! - `STORE_USERNAME` / `STORE_PASSWORD` - Login credentials
//! - `STORE_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use webshop_core::{Availability, BrandId, CategoryId, OrderId, OrderStatus, Price, ProductId};

mod commands;
mod prompt;
mod render;
mod telemetry;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(author, version, about = "Webshop terminal client")]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the environment configuration.
#[derive(Args, Debug, Default)]
struct Connection {
    /// Backend API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Login username
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Login password
    #[arg(short, long, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    Products,
    /// Search products
    Search(SearchArgs),
    /// Show stock figures for a product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Add a product to the catalog
    CreateProduct(CreateProductArgs),
    /// Fill the cart and place an order
    Buy {
        /// Product to buy as `ID` or `ID:QTY` (repeatable)
        #[arg(short, long = "item", required = true, value_parser = commands::orders::parse_item)]
        items: Vec<(ProductId, u32)>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List order history
    Orders,
    /// Change an order's status
    OrderStatus {
        /// Order ID
        id: OrderId,
        /// New status (`pending`, `confirmed`, `shipped`, `delivered`, `cancelled`)
        status: OrderStatus,
    },
    /// Show the dashboard report
    Reports,
    /// Show best selling products
    TopSelling {
        /// Number of products to list
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Show earnings for one day
    Earnings {
        /// Day as `YYYY-MM-DD` (default: today, UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List users
    Users,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Gender, matched exactly
    #[arg(long)]
    gender: Option<String>,

    /// Category ID
    #[arg(long)]
    category: Option<CategoryId>,

    /// Brand ID
    #[arg(long)]
    brand: Option<BrandId>,

    /// Minimum price
    #[arg(long)]
    min_price: Option<Price>,

    /// Maximum price
    #[arg(long)]
    max_price: Option<Price>,

    /// `in_stock` or `out_of_stock`
    #[arg(long)]
    availability: Option<Availability>,
}

#[derive(Args, Debug)]
struct CreateProductArgs {
    /// Product name
    #[arg(short, long)]
    name: String,

    /// Product description
    #[arg(long, default_value = "")]
    description: String,

    /// List price
    #[arg(long)]
    price: Price,

    /// Discount in percent
    #[arg(long, default_value = "0")]
    discount: Decimal,

    /// Target gender
    #[arg(long, default_value = "Unisex")]
    gender: String,

    /// Initial stock
    #[arg(short, long)]
    quantity: i64,

    /// Category ID
    #[arg(long)]
    category: CategoryId,

    /// Brand ID
    #[arg(long)]
    brand: BrandId,
}

#[tokio::main]
async fn main() {
    let settings = telemetry::TelemetryConfig::from_env();
    let _sentry_guard = telemetry::init_sentry(&settings);
    telemetry::init_tracing(&settings);

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let connection = cli.connection;
    match cli.command {
        Commands::Products => commands::catalog::products(&connection).await,
        Commands::Search(args) => commands::catalog::search(&connection, args).await,
        Commands::Product { id } => commands::catalog::product(&connection, id).await,
        Commands::CreateProduct(args) => {
            commands::catalog::create_product(&connection, args).await
        }
        Commands::Buy { items, yes } => commands::orders::buy(&connection, &items, yes).await,
        Commands::Orders => commands::orders::list(&connection).await,
        Commands::OrderStatus { id, status } => {
            commands::orders::set_status(&connection, id, status).await
        }
        Commands::Reports => commands::reports::dashboard(&connection).await,
        Commands::TopSelling { limit } => commands::reports::top_selling(&connection, limit).await,
        Commands::Earnings { date } => commands::reports::earnings(&connection, date).await,
        Commands::Users => commands::reports::users(&connection).await,
    }
}
