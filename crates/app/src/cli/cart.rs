use std::io;

use clap::{Args, Subcommand};
use storefront::{
    cart::{LineItem, LineItemId},
    catalog::{Catalog, DatastoreCatalog},
    products::Product,
};

use crate::{config::StorageConfig, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show(ShowCartArgs),

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a line from the cart
    Remove(RemoveArgs),

    /// Change the quantity of a line; values below 1 are ignored
    Set(SetArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ShowCartArgs {
    /// Print the cart snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Catalog product id
    product_id: String,

    /// Size option
    #[arg(long)]
    size: Option<String>,

    /// Color option
    #[arg(long)]
    color: Option<String>,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Line id as shown by `cart show`
    line_id: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Line id as shown by `cart show`
    line_id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(command: CartCommand, storage: &StorageConfig) -> Result<(), String> {
    let mut store = storage.open_cart()?;

    match command.command {
        CartSubcommand::Show(args) if args.json => {
            let json = serde_json::to_string_pretty(&store.snapshot())
                .map_err(|error| format!("failed to encode cart: {error}"))?;

            println!("{json}");

            return Ok(());
        }
        CartSubcommand::Show(_) => {}
        CartSubcommand::Add(args) => {
            let item = line_item(storage, &args)?;

            store
                .add(item)
                .map_err(|error| format!("failed to add item: {error}"))?;
        }
        CartSubcommand::Remove(args) => {
            store
                .remove(line_id(args.line_id)?)
                .map_err(|error| format!("failed to remove item: {error}"))?;
        }
        CartSubcommand::Set(args) => {
            store
                .set_quantity(line_id(args.line_id)?, args.quantity)
                .map_err(|error| format!("failed to set quantity: {error}"))?;
        }
        CartSubcommand::Clear => {
            store
                .clear()
                .map_err(|error| format!("failed to clear cart: {error}"))?;
        }
    }

    render::write_cart(&mut io::stdout().lock(), store.state())
        .map_err(|error| format!("failed to write output: {error}"))
}

fn line_item(storage: &StorageConfig, args: &AddArgs) -> Result<LineItem, String> {
    let datastore = storage.open_datastore()?;

    let product = DatastoreCatalog::new(&datastore)
        .product(&args.product_id)
        .map_err(|error| format!("failed to load product: {error}"))?
        .ok_or_else(|| format!("product {} not found", args.product_id))?;

    check_option("size", args.size.as_deref(), &product, Product::available_sizes)?;
    check_option("color", args.color.as_deref(), &product, Product::available_colors)?;

    LineItem::from_product(
        &product,
        args.size.as_deref(),
        args.color.as_deref(),
        args.quantity,
        storage.currency()?,
    )
    .map_err(|error| format!("failed to add product {}: {error}", product.id))
}

fn check_option<'p, I>(
    kind: &str,
    selected: Option<&str>,
    product: &'p Product,
    available: impl Fn(&'p Product) -> I,
) -> Result<(), String>
where
    I: Iterator<Item = &'p str>,
{
    let Some(selected) = selected else {
        return Ok(());
    };

    let mut options = available(product).peekable();

    if options.peek().is_none() {
        return Err(format!("product {} has no {kind} options", product.id));
    }

    if options.any(|option| option == selected) {
        Ok(())
    } else {
        Err(format!("{kind} {selected} is not available for product {}", product.id))
    }
}

fn line_id(id: String) -> Result<LineItemId, String> {
    LineItemId::new(id).map_err(|error| error.to_string())
}
