//! In-memory persistence

use std::sync::Mutex;

use crate::{
    cart::CartSnapshot,
    persistence::{CartPersistence, PersistenceError},
};

/// Keeps the last snapshot in memory, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshot: Mutex<Option<CartSnapshot>>,
}

impl MemoryPersistence {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter that restores `snapshot`.
    pub fn with_snapshot(snapshot: CartSnapshot) -> Self {
        MemoryPersistence {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    /// The last saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Poisoned`] if a writer panicked.
    pub fn saved(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        self.load()
    }
}

impl CartPersistence for MemoryPersistence {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError> {
        let mut stored = self
            .snapshot
            .lock()
            .map_err(|_err| PersistenceError::Poisoned)?;

        *stored = Some(snapshot.clone());

        Ok(())
    }

    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        self.snapshot
            .lock()
            .map(|stored| stored.clone())
            .map_err(|_err| PersistenceError::Poisoned)
    }
}
