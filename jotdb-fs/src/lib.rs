//! File storage backend for jotdb.
//!
//! This crate provides [`FileBackend`], which keeps the whole document sequence in one JSON
//! file. Reads create the file when it is missing; writes go through [`AtomicWriter`], which
//! replaces the file atomically and coalesces snapshots submitted while a write is in
//! flight.
//!
//! # Example
//!
//! ```ignore
//! use jotdb_core::{backend::StoreBackendBuilder, store::Database};
//! use jotdb_fs::FileBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = FileBackend::builder("data/weather.json").build().await?;
//!     let db = Database::builder().backend(backend).build().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as jotdb_fs;

pub mod reader;
pub mod store;
pub mod writer;

pub use store::{FileBackend, FileBackendBuilder};
pub use writer::AtomicWriter;
