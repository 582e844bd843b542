use clap::Args;
use storefront::{
    checkout::{CheckoutForm, Customer, DatastoreOrders, place_order},
    prices::format_price,
};

use crate::config::StorageConfig;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Contact email
    #[arg(long)]
    email: String,

    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Company
    #[arg(long)]
    company: Option<String>,

    /// Street address
    #[arg(long)]
    address: String,

    /// Apartment, suite
    #[arg(long)]
    apartment: Option<String>,

    /// City
    #[arg(long)]
    city: String,

    /// Country
    #[arg(long)]
    country: Option<String>,

    /// State or province
    #[arg(long)]
    region: Option<String>,

    /// Postal code
    #[arg(long)]
    postal_code: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Signed-in customer id
    #[arg(long, requires = "customer_email")]
    customer_id: Option<String>,

    /// Signed-in customer email
    #[arg(long, requires = "customer_id")]
    customer_email: Option<String>,
}

impl CheckoutArgs {
    fn into_parts(self) -> (CheckoutForm, Option<Customer>) {
        let customer = self
            .customer_id
            .zip(self.customer_email)
            .map(|(id, email)| Customer { email, id });

        let form = CheckoutForm {
            email_address: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            address: self.address,
            apartment: self.apartment,
            city: self.city,
            country: self.country,
            region: self.region,
            postal_code: self.postal_code,
            phone: self.phone,
        };

        (form, customer)
    }
}

pub(crate) fn run(args: CheckoutArgs, storage: &StorageConfig) -> Result<(), String> {
    let mut datastore = storage.open_datastore()?;
    let mut store = storage.open_cart()?;
    let (form, customer) = args.into_parts();

    let receipt = place_order(
        &mut store,
        form,
        customer,
        &mut DatastoreOrders::new(&mut datastore),
    )
    .map_err(|error| format!("checkout failed: {error}"))?;

    println!("order_id: {}", receipt.id);
    println!("subtotal: {}", format_price(&receipt.subtotal));
    println!("order_date: {}", receipt.order_date);
    println!("order has been placed successfully");

    Ok(())
}
