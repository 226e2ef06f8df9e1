//! Updates and the engine that applies them.
//!
//! An [`Update`] is either a set of per-field changes or a single transform over the
//! whole document. Applying one never touches the stored document: [`apply_update`]
//! works on a copy and returns the normalized result, leaving the decision to commit it
//! to the caller.
//!
//! # Example
//!
//! ```ignore
//! use jotdb_core::{update::Update, value::Value};
//!
//! let update = Update::builder()
//!     .set("status", "done")
//!     .unset("draft")
//!     .with("revision", |current| match current.as_f64() {
//!         Some(n) => Value::from(n + 1.0),
//!         None => Value::from(1),
//!     })
//!     .build();
//! ```

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    normalize::normalize_map,
    value::{Map, Value, field},
};

/// A value transform: receives the current value and returns the replacement.
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// What to do with one field.
#[derive(Clone)]
pub enum UpdateValue {
    /// Replace the field with this value. [`Value::Absent`] removes the field.
    Value(Value),
    /// Replace the field with the transform's result. The transform receives
    /// [`Value::Absent`] when the field is missing, and returning it removes the field.
    Transform(Transform),
}

impl UpdateValue {
    pub fn transform<F>(transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        UpdateValue::Transform(Arc::new(transform))
    }

    fn resolve(&self, current: Value) -> Value {
        match self {
            UpdateValue::Value(value) => value.clone(),
            UpdateValue::Transform(transform) => transform(current),
        }
    }
}

impl fmt::Debug for UpdateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            UpdateValue::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

macro_rules! impl_update_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for UpdateValue {
                fn from(value: $ty) -> Self {
                    UpdateValue::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_update_value_from!(
    bool, f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize,
    &str, String, Vec<Value>, Map, ()
);

impl From<Value> for UpdateValue {
    fn from(value: Value) -> Self {
        UpdateValue::Value(value)
    }
}

impl From<Transform> for UpdateValue {
    fn from(transform: Transform) -> Self {
        UpdateValue::Transform(transform)
    }
}

/// Changes to apply to matching documents.
#[derive(Clone)]
pub enum Update {
    /// Per-field updates, applied in declaration order.
    Fields(IndexMap<String, UpdateValue>),
    /// A transform over the whole document. It must return an object.
    Document(Transform),
}

impl Update {
    pub fn builder() -> UpdateBuilder {
        UpdateBuilder::default()
    }

    /// Creates a whole-document update.
    pub fn document<F>(transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Update::Document(Arc::new(transform))
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Update::Document(_) => f.write_str("Document(..)"),
        }
    }
}

impl From<Map> for Update {
    fn from(map: Map) -> Self {
        Update::Fields(
            map.into_iter()
                .map(|(key, value)| (key, UpdateValue::Value(value)))
                .collect()
        )
    }
}

impl From<UpdateBuilder> for Update {
    fn from(builder: UpdateBuilder) -> Self {
        builder.build()
    }
}

/// Builder for per-field updates.
#[derive(Debug, Default, Clone)]
pub struct UpdateBuilder {
    fields: IndexMap<String, UpdateValue>,
}

impl UpdateBuilder {
    /// Sets a field to a value, or to a transform when given an [`UpdateValue`].
    pub fn set(mut self, name: impl Into<String>, value: impl Into<UpdateValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Removes a field.
    pub fn unset(self, name: impl Into<String>) -> Self {
        self.set(name, Value::Absent)
    }

    /// Replaces a field with the result of `transform` applied to its current value.
    pub fn with<F>(self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.set(name, UpdateValue::transform(transform))
    }

    pub fn build(self) -> Update {
        Update::Fields(self.fields)
    }
}

/// Computes the updated form of `document`.
///
/// The input is left untouched. Field updates insert new keys at the end and keep the
/// position of existing ones; absent results remove the key. The result is normalized.
pub fn apply_update(document: &Map, update: &Update) -> DocumentStoreResult<Map> {
    match update {
        Update::Fields(fields) => {
            let mut updated = document.clone();

            for (key, update_value) in fields {
                let current = field(&updated, key).clone();

                match update_value.resolve(current) {
                    Value::Absent => {
                        updated.shift_remove(key);
                    },
                    value => {
                        updated.insert(key.clone(), value);
                    },
                }
            }

            Ok(normalize_map(updated))
        },
        Update::Document(transform) => match transform(Value::Object(document.clone())) {
            Value::Object(updated) => Ok(normalize_map(updated)),
            _ => Err(DocumentStoreError::InvalidDocument("Document must be an object".to_string())),
        },
    }
}
