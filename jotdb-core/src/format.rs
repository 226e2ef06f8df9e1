//! The storage text format: a JSON array of objects.
//!
//! Compact output has no whitespace; pretty output indents with one tab per level.

use std::borrow::Borrow;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    normalize::normalize_map,
    value::{Entries, Map, Value},
};

/// Text of an empty store.
pub const EMPTY_STORAGE: &str = "[]";

/// Parses storage text into normalized documents.
pub fn parse(raw: &str) -> DocumentStoreResult<Vec<Map>> {
    let Value::Array(items) = serde_json::from_str::<Value>(raw)? else {
        return Err(DocumentStoreError::InvalidStorage(
            "Database storage should be an array of objects".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(normalize_map(map)),
            _ => Err(DocumentStoreError::InvalidStorage(
                "Database storage should contain only objects".to_string(),
            )),
        })
        .collect()
}

/// Serializes documents into storage text.
pub fn serialize<D: Borrow<Map>>(documents: &[D], pretty: bool) -> DocumentStoreResult<String> {
    let entries = documents
        .iter()
        .map(|document| Entries(document.borrow()))
        .collect::<Vec<_>>();

    if !pretty {
        return Ok(serde_json::to_string(&entries)?);
    }

    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"\t"));
    entries.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|err| DocumentStoreError::Serialization(err.to_string()))
}
