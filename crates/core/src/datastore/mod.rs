//! Datastore
//!
//! A flat-file JSON document store laid out like a json-server `db.json`: a
//! top-level object of named collections, each an array of records. Writes
//! stamp `createdAt`/`updatedAt` and are flushed to disk atomically.

use std::{
    io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::files::{read_optional, write_atomic};

mod query;
pub mod record_id;

pub use query::{DEFAULT_PAGE_LIMIT, Page, Query};

/// Field holding a record's id.
pub const ID: &str = "id";

/// Field stamped when a record is inserted.
pub const CREATED_AT: &str = "createdAt";

/// Field stamped on every write.
pub const UPDATED_AT: &str = "updatedAt";

/// Datastore errors
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// IO error reading or writing the datastore file
    #[error("failed to access datastore file: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or encoding error
    #[error("failed to parse datastore: {0}")]
    Json(#[from] serde_json::Error),

    /// The file does not hold a JSON object at the top level.
    #[error("datastore root must be a JSON object")]
    InvalidRoot,

    /// A collection holds something other than an array.
    #[error("collection {0} is not an array")]
    InvalidCollection(String),

    /// Records must be JSON objects.
    #[error("records must be JSON objects")]
    InvalidRecord,

    /// No record with the given id.
    #[error("record {id} not found in {collection}")]
    NotFound {
        /// Collection name
        collection: String,
        /// Record id
        id: String,
    },

    /// A record with the given id already exists.
    #[error("record {id} already exists in {collection}")]
    AlreadyExists {
        /// Collection name
        collection: String,
        /// Record id
        id: String,
    },
}

/// Flat-file JSON datastore
#[derive(Debug)]
pub struct Datastore {
    path: PathBuf,
    collections: Map<String, Value>,
}

impl Datastore {
    /// Open the datastore at `path`. A missing file opens an empty store.
    ///
    /// # Errors
    ///
    /// Returns a [`DatastoreError`] if the file cannot be read or is not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatastoreError> {
        let path = path.into();

        let collections = match read_optional(&path)? {
            Some(contents) => match serde_json::from_str(&contents)? {
                Value::Object(collections) => collections,
                _ => return Err(DatastoreError::InvalidRoot),
            },
            None => Map::new(),
        };

        debug!(path = %path.display(), collections = collections.len(), "opened datastore");

        Ok(Datastore { path, collections })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the collections in the store.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// List the records of a collection matching `query`.
    ///
    /// `total_count` counts every matching record before paging is applied.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError::InvalidCollection`] if the collection is not an array.
    pub fn list(&self, collection: &str, query: &Query) -> Result<Page<Value>, DatastoreError> {
        let matching: Vec<&Value> = self
            .records(collection)?
            .iter()
            .filter(|record| query.matches(record))
            .collect();

        Ok(query.paginate(matching))
    }

    /// Find a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError::InvalidCollection`] if the collection is not an array.
    pub fn get(&self, collection: &str, id: &str) -> Result<Option<&Value>, DatastoreError> {
        Ok(self
            .records(collection)?
            .iter()
            .find(|record| record_id::matches(record, id)))
    }

    /// Insert a record, generating an id if it has none and stamping both timestamps.
    ///
    /// # Errors
    ///
    /// Returns a [`DatastoreError`] if the record is not an object, the id is
    /// taken, or the store cannot be flushed.
    pub fn insert(&mut self, collection: &str, record: Value) -> Result<Value, DatastoreError> {
        let Value::Object(mut fields) = record else {
            return Err(DatastoreError::InvalidRecord);
        };

        let id = match fields.get(ID).and_then(record_id::as_key) {
            Some(id) => id,
            None => {
                let id = Uuid::now_v7().to_string();
                fields.insert(ID.to_string(), Value::String(id.clone()));
                id
            }
        };

        if self.get(collection, &id)?.is_some() {
            return Err(DatastoreError::AlreadyExists {
                collection: collection.to_string(),
                id,
            });
        }

        let now = Self::now();
        fields.insert(CREATED_AT.to_string(), now.clone());
        fields.insert(UPDATED_AT.to_string(), now);

        let record = Value::Object(fields);

        self.commit(|collections| {
            records_mut(collections, collection)?.push(record.clone());
            Ok(())
        })?;

        debug!(collection, %id, "inserted record");

        Ok(record)
    }

    /// Replace a record wholesale, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns a [`DatastoreError`] if the record is not an object, does not
    /// exist, or the store cannot be flushed.
    pub fn replace(
        &mut self,
        collection: &str,
        id: &str,
        record: Value,
    ) -> Result<Value, DatastoreError> {
        let Value::Object(mut fields) = record else {
            return Err(DatastoreError::InvalidRecord);
        };

        self.commit(|collections| {
            let existing = find_mut(collections, collection, id)?;

            if let Some(stored_id) = existing.get(ID).cloned() {
                fields.insert(ID.to_string(), stored_id);
            }

            if let Some(created_at) = existing.get(CREATED_AT).cloned() {
                fields.entry(CREATED_AT).or_insert(created_at);
            }

            fields.insert(UPDATED_AT.to_string(), Self::now());
            *existing = fields;

            Ok(Value::Object(existing.clone()))
        })
    }

    /// Shallow-merge `partial` into a record. The id cannot be changed.
    ///
    /// # Errors
    ///
    /// Returns a [`DatastoreError`] if `partial` is not an object, the record
    /// does not exist, or the store cannot be flushed.
    pub fn patch(
        &mut self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Value, DatastoreError> {
        let Value::Object(partial) = partial else {
            return Err(DatastoreError::InvalidRecord);
        };

        self.commit(|collections| {
            let existing = find_mut(collections, collection, id)?;

            for (key, value) in partial {
                if key != ID {
                    existing.insert(key, value);
                }
            }

            existing.insert(UPDATED_AT.to_string(), Self::now());

            Ok(Value::Object(existing.clone()))
        })
    }

    /// Delete a record, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns a [`DatastoreError`] if the collection is not an array or the
    /// store cannot be flushed.
    pub fn delete(&mut self, collection: &str, id: &str) -> Result<bool, DatastoreError> {
        if self.get(collection, id)?.is_none() {
            return Ok(false);
        }

        self.commit(|collections| {
            records_mut(collections, collection)?
                .retain(|record| !record_id::matches(record, id));
            Ok(true)
        })
    }

    /// Apply `change` to a copy of the collections and keep it only once it is on disk.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Map<String, Value>) -> Result<T, DatastoreError>,
    ) -> Result<T, DatastoreError> {
        let mut staged = self.collections.clone();
        let output = change(&mut staged)?;

        write_collections(&self.path, &staged)?;
        self.collections = staged;

        Ok(output)
    }

    fn now() -> Value {
        Value::String(Timestamp::now().to_string())
    }

    fn records(&self, collection: &str) -> Result<&[Value], DatastoreError> {
        match self.collections.get(collection) {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(DatastoreError::InvalidCollection(collection.to_string())),
            None => Ok(&[]),
        }
    }
}

fn write_collections(path: &Path, collections: &Map<String, Value>) -> Result<(), DatastoreError> {
    let contents = serde_json::to_vec_pretty(collections)?;

    write_atomic(path, &contents)?;

    Ok(())
}

fn records_mut<'a>(
    collections: &'a mut Map<String, Value>,
    collection: &str,
) -> Result<&'a mut Vec<Value>, DatastoreError> {
    match collections
        .entry(collection)
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(records) => Ok(records),
        _ => Err(DatastoreError::InvalidCollection(collection.to_string())),
    }
}

fn find_mut<'a>(
    collections: &'a mut Map<String, Value>,
    collection: &str,
    id: &str,
) -> Result<&'a mut Map<String, Value>, DatastoreError> {
    records_mut(collections, collection)?
        .iter_mut()
        .find(|record| record_id::matches(record, id))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| DatastoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
}
