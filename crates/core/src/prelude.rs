//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CartCommand, CartError, CartSnapshot, CartState, LineItem, LineItemDetails,
        LineItemError, LineItemId, RestoreError,
    },
    catalog::{Catalog, CatalogError, DatastoreCatalog, ProductPage, ProductQuery},
    checkout::{
        CheckoutError, CheckoutForm, CheckoutFormError, Customer, DatastoreOrders, OrderError,
        OrderGateway, OrderReceipt, place_order,
    },
    datastore::{Datastore, DatastoreError, Page, Query},
    persistence::{
        BackgroundPersistence, CartPersistence, JsonFilePersistence, MemoryPersistence,
        PersistenceError,
    },
    prices::{PriceError, find_currency, format_price, parse_price},
    products::{Category, Product},
    store::CartStore,
};
