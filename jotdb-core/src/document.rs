//! Typed documents.
//!
//! Any serde type that serializes to a JSON object can be stored. Conversion goes through
//! the value model, so stored documents keep the field order of the type's serializer.

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    normalize::normalize_document,
    value::{Entries, Map, Value},
};

/// Marker trait for types that can be stored in a [`Database`](crate::store::Database).
///
/// Implemented for every `Serialize + DeserializeOwned` type.
///
/// # Example
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Reading {
///     pub station: String,
///     pub temperature: f64,
/// }
///
/// let readings = db.typed::<Reading>();
/// readings.insert_one(&Reading { station: "north".into(), temperature: 21.5 }).await?;
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Conversion between typed documents and stored maps.
pub trait DocumentExt: Document + Sized {
    /// Converts this document into a normalized map.
    ///
    /// # Errors
    ///
    /// Fails with [`DocumentStoreError::InvalidDocument`] if the type does not serialize
    /// to an object.
    fn to_document(&self) -> DocumentStoreResult<Map>;

    /// Reads a document back from a stored map.
    fn from_document(document: &Map) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> DocumentStoreResult<Map> {
        normalize_document(to_value(self)?)
    }

    fn from_document(document: &Map) -> DocumentStoreResult<Self> {
        Ok(serde_json::from_value(serde_json::to_value(Entries(document))?)?)
    }
}

/// Serializes any serde value into the value model.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> DocumentStoreResult<Value> {
    Ok(Value::from(serde_json::to_value(value)?))
}

/// Deserializes a serde type out of the value model.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> DocumentStoreResult<T> {
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(DocumentStoreError::from)
}
