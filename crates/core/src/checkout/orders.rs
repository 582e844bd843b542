//! Orders

use jiff::Timestamp;
use mockall::automock;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::LineItem,
    checkout::CheckoutForm,
    datastore::{Datastore, DatastoreError, ID, record_id},
    prices,
};

/// Collection holding placed orders.
pub const ORDERS: &str = "orders";

/// Order submission errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// Underlying datastore failure
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    /// The order could not be encoded.
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    /// The stored order came back without an id.
    #[error("stored order has no id")]
    MissingId,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    /// Accepted and awaiting fulfilment
    Processing,
}

/// Signed-in customer placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Customer email
    pub email: String,

    /// Customer id
    pub id: String,
}

/// Order ready to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Contact and shipping details
    pub data: CheckoutForm,

    /// Line items as they were in the cart
    pub products: Vec<LineItem>,

    /// Cart total
    #[serde(serialize_with = "prices::serde_money::serialize")]
    pub subtotal: Money<'static, Currency>,

    /// Customer, when signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Customer>,

    /// Order status
    pub order_status: OrderStatus,

    /// When the order was placed
    pub order_date: Timestamp,
}

/// Confirmation of a stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    /// Order id assigned by the gateway
    pub id: String,

    /// Order total
    pub subtotal: Money<'static, Currency>,

    /// When the order was placed
    pub order_date: Timestamp,
}

/// Destination for placed orders.
#[automock]
pub trait OrderGateway {
    /// Store an order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the order cannot be stored.
    fn submit(&mut self, order: &NewOrder) -> Result<OrderReceipt, OrderError>;
}

/// Gateway writing to the `orders` datastore collection.
#[derive(Debug)]
pub struct DatastoreOrders<'a> {
    datastore: &'a mut Datastore,
}

impl<'a> DatastoreOrders<'a> {
    /// Write orders into the given datastore.
    pub fn new(datastore: &'a mut Datastore) -> Self {
        DatastoreOrders { datastore }
    }
}

impl OrderGateway for DatastoreOrders<'_> {
    fn submit(&mut self, order: &NewOrder) -> Result<OrderReceipt, OrderError> {
        let stored = self.datastore.insert(ORDERS, serde_json::to_value(order)?)?;
        let id = stored
            .get(ID)
            .and_then(record_id::as_key)
            .ok_or(OrderError::MissingId)?;

        debug!(%id, items = order.products.len(), "stored order");

        Ok(OrderReceipt {
            id,
            subtotal: order.subtotal,
            order_date: order.order_date,
        })
    }
}
