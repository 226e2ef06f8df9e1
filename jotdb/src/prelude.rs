//! Convenient re-exports of commonly used types from jotdb.
//!
//! ```ignore
//! use jotdb::prelude::*;
//! ```

pub use jotdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::TypedCollection,
    config::{DatabaseConfig, SchemaValidator},
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Filter, Query, QueryBuilder, QueryValue},
    store::{Database, DatabaseBuilder},
    update::{Update, UpdateBuilder, UpdateValue},
    value::{Map, SharedDocument, Value, ValueType},
};
