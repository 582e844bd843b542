//! Storefront
//!
//! Shopping cart state, catalog access and checkout for a small storefront,
//! backed by a flat-file JSON datastore.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod datastore;
pub mod persistence;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod store;

mod files;
