//! Cart Persistence
//!
//! Adapters that keep cart snapshots across sessions. The store treats every
//! adapter failure as non-fatal: the in-memory cart stays authoritative.

use std::{io, sync::Arc};

use mockall::automock;
use thiserror::Error;

use crate::cart::CartSnapshot;

mod background;
mod file;
mod memory;

pub use background::BackgroundPersistence;
pub use file::JsonFilePersistence;
pub use memory::MemoryPersistence;

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error reading or writing storage
    #[error("failed to access cart storage: {0}")]
    Io(#[from] io::Error),

    /// Snapshot encoding or decoding error
    #[error("failed to encode cart snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock guarding the snapshot was poisoned.
    #[error("cart storage lock poisoned")]
    Poisoned,

    /// The background writer has shut down.
    #[error("cart persistence worker is not running")]
    Closed,
}

/// Durable storage for cart snapshots.
#[automock]
pub trait CartPersistence {
    /// Store the latest snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the snapshot could not be stored.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError>;

    /// Load the stored snapshot, or `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if storage exists but cannot be read.
    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError>;
}

impl<P: CartPersistence + ?Sized> CartPersistence for &P {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        (**self).load()
    }
}

impl<P: CartPersistence + ?Sized> CartPersistence for Arc<P> {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        (**self).load()
    }
}
