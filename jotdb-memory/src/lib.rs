//! In-memory storage backend for jotdb.
//!
//! This crate provides [`InMemoryBackend`], a [`StoreBackend`](jotdb_core::backend::StoreBackend)
//! that keeps the last persisted snapshot in process memory. It is meant for tests and for
//! databases that should survive being rebuilt but not the process.
//!
//! # Quick Start
//!
//! ```ignore
//! use jotdb_core::store::Database;
//! use jotdb_memory::InMemoryBackend;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryBackend::builder().build().await?;
//!     let db = Database::builder().backend(backend.clone()).build().await?;
//!
//!     db.insert_one(json!({ "name": "Alice" })).await?;
//!     assert!(backend.snapshot().is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as jotdb_memory;

pub mod store;

pub use store::{InMemoryBackend, InMemoryBackendBuilder};
