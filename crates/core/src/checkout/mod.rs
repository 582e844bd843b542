//! Checkout
//!
//! Turns the current cart into a placed order. The cart is only cleared once
//! the gateway has accepted the order.

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{cart::CartError, persistence::CartPersistence, prices::format_price, store::CartStore};

mod form;
mod orders;

pub use form::{CheckoutForm, CheckoutFormError, MIN_NAME_LENGTH};
pub use orders::{
    Customer, DatastoreOrders, MockOrderGateway, NewOrder, ORDERS, OrderError, OrderGateway,
    OrderReceipt, OrderStatus,
};

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The checkout form failed validation.
    #[error(transparent)]
    InvalidForm(#[from] CheckoutFormError),

    /// The gateway rejected the order; the cart is untouched.
    #[error("failed to place order: {0}")]
    Order(#[from] OrderError),

    /// The cart could not be cleared after the order was placed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Place an order for everything in the cart.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, the form is invalid, or
/// the gateway fails. The cart is left intact in each case.
pub fn place_order<P, G>(
    store: &mut CartStore<P>,
    form: CheckoutForm,
    customer: Option<Customer>,
    gateway: &mut G,
) -> Result<OrderReceipt, CheckoutError>
where
    P: CartPersistence,
    G: OrderGateway + ?Sized,
{
    if store.state().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    form.validate()?;

    let snapshot = store.snapshot();
    let order = NewOrder {
        data: form,
        products: snapshot.items,
        subtotal: snapshot.total_amount,
        user: customer,
        order_status: OrderStatus::Processing,
        order_date: Timestamp::now(),
    };

    let receipt = gateway.submit(&order)?;

    store.clear()?;

    info!(
        order = %receipt.id,
        items = order.products.len(),
        subtotal = %format_price(&receipt.subtotal),
        "placed order"
    );

    Ok(receipt)
}
