//! JSON file persistence

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    cart::CartSnapshot,
    files::{read_optional, write_atomic},
    persistence::{CartPersistence, PersistenceError},
};

/// Persisted document; only the cart subtree is stored.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedRoot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cart: Option<CartSnapshot>,
}

/// Stores the snapshot as `{ "cart": ... }` in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist to the file at `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFilePersistence { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartPersistence for JsonFilePersistence {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError> {
        let root = PersistedRoot {
            cart: Some(snapshot.clone()),
        };

        write_atomic(&self.path, &serde_json::to_vec_pretty(&root)?)?;

        debug!(path = %self.path.display(), items = snapshot.items.len(), "saved cart snapshot");

        Ok(())
    }

    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        let Some(contents) = read_optional(&self.path)? else {
            return Ok(None);
        };

        let root: PersistedRoot = serde_json::from_str(&contents)?;

        Ok(root.cart)
    }
}
