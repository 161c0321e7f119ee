//! RocketShoes CLI - cart operations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of product 1
//! rocketshoes add 1
//!
//! # Set product 1 to three units
//! rocketshoes update 1 3
//!
//! # Remove product 1
//! rocketshoes remove 1
//!
//! # Print the cart
//! rocketshoes show
//! ```
//!
//! Every command prints the resulting cart as JSON. Failed operations log
//! their notice and exit with status 1.
//!
//! See [`rocketshoes_cart::config`] for the environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::{ProductId, UpdateProductAmount};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product ID
        id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: i32,
    },
    /// Set the quantity of a product in the cart
    Update {
        /// Product ID
        id: i32,

        /// New quantity (zero or negative is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Print the cart
    Show,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries the cart
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes=info,rocketshoes_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = commands::cart::open().await?;

    let outcome = match cli.command {
        Commands::Add { id } => manager.add_product(ProductId::new(id)).await,
        Commands::Remove { id } => manager.remove_product(ProductId::new(id)).await,
        Commands::Update { id, amount } => {
            manager
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(id),
                    amount,
                })
                .await
        }
        Commands::Show => Ok(()),
    };

    commands::cart::print(manager.cart())?;
    outcome?;
    Ok(())
}
