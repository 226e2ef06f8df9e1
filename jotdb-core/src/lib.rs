//! An embeddable JSON document database.
//!
//! This crate is the core of the jotdb project and provides:
//!
//! - **Value model** ([`value`]) - The recursive document value, including the absence marker
//! - **Normalization** ([`normalize`]) - Forcing values into the storable model
//! - **Comparison** ([`compare`]) - Deep clone and structural equality
//! - **Queries** ([`query`], [`evaluator`]) - Field queries, operators and narrowing search
//! - **Updates** ([`update`]) - Field and whole-document updates
//! - **Storage format** ([`format`]) - Parsing and serializing the storage text
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Database** ([`store`]) - The document sequence and its operations
//! - **Configuration** ([`config`]) - Database options and the schema hook
//! - **Typed documents** ([`document`], [`collection`]) - Working with serde types
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use jotdb_core::{query::{Filter, Query}, store::Database};
//! use serde_json::json;
//!
//! let db = Database::new();
//! db.insert_one(json!({ "temperature": 20, "humidity": 50 })).await?;
//!
//! let found = db
//!     .find_one(Query::builder().field("humidity", Filter::lt(60)))
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as jotdb_core;

pub mod backend;
pub mod collection;
pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod normalize;
pub mod query;
pub mod store;
pub mod update;
pub mod value;
