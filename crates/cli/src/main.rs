//! Rocket Shoes CLI - Cart management and storage migrations.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 3
//! rs-cli cart add 3
//!
//! # Request amount 2 for product 3
//! rs-cli cart update 3 2
//!
//! # Remove product 3
//! rs-cli cart remove 3
//!
//! # Create the PostgreSQL cart storage table
//! rs-cli migrate
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and change the cart using the storefront configuration
//! - `migrate` - Run cart storage migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocket_shoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "Rocket Shoes CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Run cart storage migrations (`PostgreSQL`)
    Migrate,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Request a new amount for a product in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// Requested amount
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add { product_id } => commands::cart::add(product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(product_id).await?,
            CartAction::Update { product_id, amount } => {
                commands::cart::update(product_id, amount).await?;
            }
        },
        Commands::Migrate => commands::migrate::run().await?,
    }
    Ok(())
}
