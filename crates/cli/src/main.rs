//! Amazona CLI - cart, browsing history and database tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart (priced by the pricing service)
//! amz cart add -p 64f1c2 --name "Classic Tee" --price 19.90 --stock 5 -c Red -s M
//!
//! # Price in-process instead of calling the service
//! amz --local-pricing cart show
//!
//! # Record and list viewed products
//! amz history add -p 64f1c2 --category Shirts
//! amz history show
//!
//! # Run storefront database migrations
//! amz migrate
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the persisted cart
//! - `history` - Show and change the browsing history
//! - `migrate` - Run database migrations
//!
//! Snapshots go to `PostgreSQL` when `STOREFRONT_DATABASE_URL` is set, and
//! to JSON files under `AMAZONA_SNAPSHOT_DIR` otherwise.

#![cfg_attr(not(test), forbid(unsafe_code))]

use amazona_storefront::config::ClientConfig;
use amazona_storefront::{BrowsingHistoryStore, CartStore};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

use commands::CommandError;
use commands::cart::{Offer, Selection};

#[derive(Parser)]
#[command(name = "amz")]
#[command(author, version, about = "Amazona CLI tools")]
struct Cli {
    /// Price carts in-process instead of calling the pricing service
    #[arg(long, global = true)]
    local_pricing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show and change the browsing history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Run storefront database migrations
    Migrate,
}

#[derive(Args)]
struct SelectionArgs {
    /// Product ID
    #[arg(short, long)]
    product: String,

    /// Color variant
    #[arg(short, long)]
    color: String,

    /// Size variant
    #[arg(short, long)]
    size: String,
}

impl From<SelectionArgs> for Selection {
    fn from(args: SelectionArgs) -> Self {
        Self {
            product: args.product,
            color: args.color,
            size: args.size,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Product display name
        #[arg(long)]
        name: String,

        /// URL slug (derived from the name if omitted)
        #[arg(long)]
        slug: Option<String>,

        /// Product category
        #[arg(long, default_value = "Uncategorized")]
        category: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Units in stock
        #[arg(long)]
        stock: u32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line
    Update {
        #[command(flatten)]
        selection: SelectionArgs,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Empty the cart
    Clear,
    /// Choose a delivery option (0 = Tomorrow, 1 = Next 3 Days, 2 = Next 5 Days)
    Delivery {
        /// Delivery option index
        index: usize,
    },
    /// Choose a payment method
    Payment {
        /// Payment method name (e.g. `PayPal`, Stripe)
        method: String,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List viewed products, most recent first
    Show,
    /// Record a product view
    Add {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Product category
        #[arg(long)]
        category: String,
    },
    /// Forget every viewed product
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;

    match cli.command {
        Commands::Migrate => commands::migrate::storefront(&config).await?,
        Commands::Cart { action } => {
            let resolver = commands::open_resolver(&config, cli.local_pricing)?;
            let storage = commands::open_storage(&config).await?;
            let store = CartStore::load(resolver, storage).await?;
            run_cart(&store, action).await?;
        }
        Commands::History { action } => {
            let storage = commands::open_storage(&config).await?;
            let store = BrowsingHistoryStore::load(storage).await?;
            match action {
                HistoryAction::Show => commands::history::show(&store).await,
                HistoryAction::Add { product, category } => {
                    commands::history::add(&store, &product, &category).await?;
                }
                HistoryAction::Clear => commands::history::clear(&store).await?,
            }
        }
    }
    Ok(())
}

async fn run_cart(store: &CartStore, action: CartAction) -> Result<(), CommandError> {
    match action {
        CartAction::Show => commands::cart::show(store).await,
        CartAction::Add {
            selection,
            name,
            slug,
            category,
            image,
            price,
            stock,
            quantity,
        } => {
            let offer = Offer {
                name,
                slug,
                category,
                image,
                price,
                stock,
            };
            commands::cart::add(store, &selection.into(), &offer, quantity).await?;
        }
        CartAction::Update {
            selection,
            quantity,
        } => commands::cart::update(store, &selection.into(), quantity).await?,
        CartAction::Remove { selection } => {
            commands::cart::remove(store, &selection.into()).await?;
        }
        CartAction::Clear => commands::cart::clear(store).await?,
        CartAction::Delivery { index } => commands::cart::delivery(store, index).await?,
        CartAction::Payment { method } => commands::cart::payment(store, &method).await?,
    }
    Ok(())
}
