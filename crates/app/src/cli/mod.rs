use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::{LoggingConfig, StorageConfig};

mod cart;
mod categories;
mod checkout;
mod products;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) storage: StorageConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(products::ProductsCommand),

    /// List active categories
    Categories,

    /// Inspect and change the cart
    Cart(cart::CartCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        debug!(
            db = %self.storage.db.display(),
            cart = %self.storage.cart.display(),
            currency = %self.storage.currency,
            "using storage"
        );

        match self.command {
            Commands::Products(command) => products::run(command, &self.storage),
            Commands::Categories => categories::run(&self.storage),
            Commands::Cart(command) => cart::run(command, &self.storage),
            Commands::Checkout(args) => checkout::run(args, &self.storage),
        }
    }
}
