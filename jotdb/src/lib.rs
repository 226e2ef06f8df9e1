//! Main jotdb crate: an embeddable JSON document database.
//!
//! This crate is the primary entry point for users of jotdb. It re-exports the core types
//! from [`jotdb_core`] and gives access to the storage backends.
//!
//! # Features
//!
//! - **Schemaless documents** - Store any JSON object, or any serde type that serializes to one
//! - **Composable queries** - Literal values, regular expressions, predicates and [`Filter`](query::Filter) operators
//! - **Atomic persistence** - One JSON file, replaced atomically, with coalesced writes
//! - **Pluggable storage** - File, in-memory, or your own [`StoreBackend`](backend::StoreBackend)
//!
//! # Quick Start
//!
//! ```ignore
//! use jotdb::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let db = jotdb::open("data/weather.json").await?;
//!
//!     db.insert_one(json!({ "temperature": 20, "humidity": 50 })).await?;
//!     db.insert_one(json!({ "temperature": 25, "humidity": 40 })).await?;
//!
//!     let warm = db
//!         .find_many(Query::builder().field("temperature", Filter::gt(22)))
//!         .await?;
//!
//!     db.update_many(
//!         Query::builder().field("humidity", Filter::lt(45)),
//!         Update::builder().set("dry", true),
//!     )
//!     .await?;
//!
//!     db.delete_one(Query::builder().field("temperature", 20)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Typed documents
//!
//! ```ignore
//! use jotdb::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Reading {
//!     pub temperature: f64,
//!     pub humidity: f64,
//! }
//!
//! let db = Database::new();
//! let readings = db.typed::<Reading>();
//!
//! readings.insert_one(&Reading { temperature: 25.0, humidity: 40.0 }).await?;
//! let all: Vec<Reading> = readings.find_many(Query::new()).await?;
//! ```
//!
//! # Backends
//!
//! - [`fs`] - Single-file storage with atomic, coalesced writes
//! - [`memory`] - In-process storage for tests and ephemeral databases

use std::path::PathBuf;

pub mod prelude;

pub use jotdb_core::{
    backend, collection, compare, config, document, error, evaluator, format, normalize, query,
    store, update, value,
};

// Re-exported for query-values and fixtures.
pub use regex;
pub use serde_json;

use jotdb_core::{error::DocumentStoreResult, store::Database};

/// File storage backend.
pub mod fs {
    pub use jotdb_fs::{AtomicWriter, FileBackend, FileBackendBuilder, reader::read_storage};
}

/// In-memory storage backend.
pub mod memory {
    pub use jotdb_memory::{InMemoryBackend, InMemoryBackendBuilder};
}

/// Opens the database stored at `path` with the default configuration, creating the file
/// if it does not exist.
pub async fn open(path: impl Into<PathBuf>) -> DocumentStoreResult<Database> {
    Database::builder()
        .backend(jotdb_fs::FileBackend::new(path))
        .build()
        .await
}
