//! # Flattening: Nested Values to Flat Form Keys
//!
//! The inverse of [`expand`](crate::expand): objects contribute
//! `parent.child` keys and arrays contribute `parent:index` keys.
//!
//! Flattening is lossy for shapes the key syntax cannot express. Empty
//! objects and empty arrays produce no keys, and object keys containing a
//! delimiter are not escaped. For every other tree,
//! `expand(&flatten(v)) == v`.

use serde_json::Value;

use crate::{FlatInput, OBJECT_DELIMITER, SEQUENCE_DELIMITER};

/// Flatten a nested mapping into delimited keys.
pub fn flatten(nested: &FlatInput) -> FlatInput {
    let mut out = FlatInput::new();
    for (key, value) in nested {
        flatten_into(key.clone(), value, &mut out);
    }
    out
}

fn flatten_into(prefix: String, value: &Value, out: &mut FlatInput) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(format!("{prefix}{OBJECT_DELIMITER}{key}"), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{prefix}{SEQUENCE_DELIMITER}{index}"), child, out);
            }
        }
        scalar => {
            out.insert(prefix, scalar.clone());
        }
    }
}
