//! Table output

use std::{io, ops::Range};

use rusty_money::iso::Currency;
use storefront::{
    cart::CartState,
    catalog::ProductPage,
    prices::{format_price, money_from_decimal},
    products::{Category, Product},
};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

pub(crate) fn write_cart(out: &mut impl io::Write, cart: &CartState) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "cart is empty");
    }

    let mut builder = Builder::default();
    builder.push_record(["Line", "Item", "Variant", "Price", "Qty", "Total"]);

    for item in cart.items() {
        let details = item.details();
        let variant = [details.size.as_deref(), details.color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");
        let line_total = item
            .line_total()
            .map_or_else(|| "-".to_string(), |total| format_price(&total));

        builder.push_record([
            item.id().to_string(),
            details.title.clone(),
            variant,
            format_price(item.price()),
            item.quantity().to_string(),
            line_total,
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(3..6)))?;
    writeln!(out, "items: {}", cart.item_count())?;
    writeln!(out, "total: {}", format_price(&cart.total_amount()))
}

pub(crate) fn write_products(
    out: &mut impl io::Write,
    page: &ProductPage,
    currency: &'static Currency,
) -> io::Result<()> {
    if page.products.is_empty() {
        return writeln!(out, "no products found");
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "Category", "Price", "Stock"]);

    for product in &page.products {
        builder.push_record([
            product.id.clone(),
            product.title.clone(),
            product.category.clone(),
            display_price(product, currency),
            product.stock.to_string(),
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(3..5)))?;
    writeln!(
        out,
        "page {} of {} ({} products)",
        page.page, page.total_pages, page.total_count
    )
}

pub(crate) fn write_product(
    out: &mut impl io::Write,
    product: &Product,
    currency: &'static Currency,
) -> io::Result<()> {
    writeln!(out, "id: {}", product.id)?;
    writeln!(out, "title: {}", product.title)?;
    writeln!(out, "category: {}", product.category)?;
    writeln!(out, "price: {}", display_price(product, currency))?;
    writeln!(out, "image: {}", product.main_image())?;
    writeln!(out, "stock: {}", product.stock)?;
    writeln!(
        out,
        "sizes: {}",
        list_or_none(product.available_sizes().collect())
    )?;
    writeln!(
        out,
        "colors: {}",
        list_or_none(product.available_colors().collect())
    )?;

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }

    Ok(())
}

pub(crate) fn write_categories(out: &mut impl io::Write, categories: &[Category]) -> io::Result<()> {
    if categories.is_empty() {
        return writeln!(out, "no categories found");
    }

    let mut builder = Builder::default();
    builder.push_record(["Slug", "Name", "Order"]);

    for category in categories {
        builder.push_record([
            category.slug.clone(),
            category.name.clone(),
            category.display_order.to_string(),
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(2..3)))
}

fn styled(builder: Builder, numeric: Columns<Range<usize>>) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(numeric, Alignment::right());

    table
}

fn display_price(product: &Product, currency: &'static Currency) -> String {
    money_from_decimal(product.price, currency)
        .map_or_else(|_err| product.price.to_string(), |price| format_price(&price))
}

fn list_or_none(values: Vec<&str>) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
