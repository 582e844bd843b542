//! CLI configuration

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::Currency;
use storefront::{
    datastore::Datastore, persistence::JsonFilePersistence, prices::find_currency,
    store::CartStore,
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
}

/// Where the catalog and the cart live.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// JSON datastore holding products, categories and orders
    #[arg(long, env = "STOREFRONT_DB", default_value = "db.json", global = true)]
    pub(crate) db: PathBuf,

    /// File the cart is saved to between runs
    #[arg(
        long,
        env = "STOREFRONT_CART",
        default_value = ".storefront/cart.json",
        global = true
    )]
    pub(crate) cart: PathBuf,

    /// ISO code of the cart currency
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "BRL", global = true)]
    pub(crate) currency: String,
}

impl StorageConfig {
    pub(crate) fn currency(&self) -> Result<&'static Currency, String> {
        find_currency(&self.currency).map_err(|error| error.to_string())
    }

    pub(crate) fn open_datastore(&self) -> Result<Datastore, String> {
        Datastore::open(&self.db).map_err(|error| {
            format!("failed to open datastore {}: {error}", self.db.display())
        })
    }

    pub(crate) fn open_cart(&self) -> Result<CartStore<JsonFilePersistence>, String> {
        Ok(CartStore::open(
            self.currency()?,
            JsonFilePersistence::new(&self.cart),
        ))
    }
}
