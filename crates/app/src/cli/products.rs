use std::io;

use clap::{Args, Subcommand};
use storefront::catalog::{Catalog, DatastoreCatalog, PRODUCTS_PER_PAGE, ProductQuery};

use crate::{config::StorageConfig, render};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List a page of products
    List(ListProductsArgs),

    /// Show a single product
    Show(ShowProductArgs),
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Only list products in this category slug
    #[arg(long)]
    category: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Products per page
    #[arg(long, default_value_t = PRODUCTS_PER_PAGE)]
    per_page: usize,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    /// Product id
    id: String,
}

pub(crate) fn run(command: ProductsCommand, storage: &StorageConfig) -> Result<(), String> {
    let currency = storage.currency()?;
    let datastore = storage.open_datastore()?;
    let catalog = DatastoreCatalog::new(&datastore);
    let mut out = io::stdout().lock();

    let written = match command.command {
        ProductsSubcommand::List(args) => {
            let mut query = ProductQuery::new().page(args.page).per_page(args.per_page);

            if let Some(category) = args.category {
                query = query.category(category);
            }

            let page = catalog
                .products(&query)
                .map_err(|error| format!("failed to list products: {error}"))?;

            render::write_products(&mut out, &page, currency)
        }
        ProductsSubcommand::Show(args) => {
            let product = catalog
                .product(&args.id)
                .map_err(|error| format!("failed to load product: {error}"))?
                .ok_or_else(|| format!("product {} not found", args.id))?;

            render::write_product(&mut out, &product, currency)
        }
    };

    written.map_err(|error| format!("failed to write output: {error}"))
}
