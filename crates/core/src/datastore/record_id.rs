//! Record ids
//!
//! json-server ids may be strings or numbers; both are handled in their string form.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::datastore::ID;

/// String form of an id value, if it is a string or a number.
pub fn as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Whether `record` has the given id.
pub fn matches(record: &Value, id: &str) -> bool {
    record.get(ID).and_then(as_key).is_some_and(|key| key == id)
}

/// Deserialize an id given as either a string or a number.
///
/// # Errors
///
/// Fails for any other JSON type.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;

    as_key(&value).ok_or_else(|| D::Error::custom(format!("invalid record id: {value}")))
}
