//! Normalization: forcing arbitrary values into the storable value model.
//!
//! Non-conforming values are the absence marker and non-finite numbers. They are
//! handled differently depending on where they sit:
//!
//! - inside an object, the entry is removed;
//! - inside an array, the element becomes `null`, so positions of the other elements
//!   do not move.
//!
//! Nothing here is an error; only [`normalize_document`] fails, and only when the
//! top-level value is not an object.

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    value::{Map, Value},
};

/// Normalizes any value. A non-conforming value at the top level is treated like an
/// array slot and becomes `null`.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(normalize_array(items)),
        other if conforms(&other) => other,
        _ => Value::Null,
    }
}

/// Normalizes every entry of an object, dropping the non-conforming ones.
pub fn normalize_map(map: Map) -> Map {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(inner) => Some((key, Value::Object(normalize_map(inner)))),
            Value::Array(items) => Some((key, Value::Array(normalize_array(items)))),
            other if conforms(&other) => Some((key, other)),
            _ => None,
        })
        .collect()
}

/// Normalizes every element of an array, replacing the non-conforming ones with `null`.
pub fn normalize_array(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .map(normalize)
        .collect()
}

/// Accepts a value for storage: it must be an object, which is then normalized.
pub fn normalize_document(value: Value) -> DocumentStoreResult<Map> {
    match value {
        Value::Object(map) => Ok(normalize_map(map)),
        _ => Err(DocumentStoreError::InvalidDocument("Document must be an object".to_string())),
    }
}

fn conforms(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => true,
        Value::Number(n) => n.is_finite(),
        Value::Absent => false,
    }
}
