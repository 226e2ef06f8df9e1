//! Typed access to a database.
//!
//! A [`TypedCollection`] runs the regular [`Database`] operations and converts documents
//! to and from a serde type on the way in and out. Queries and updates stay untyped.
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use jotdb_core::query::{Filter, Query};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Reading {
//!     pub temperature: f64,
//!     pub humidity: f64,
//! }
//!
//! let readings = db.typed::<Reading>();
//! readings.insert_one(&Reading { temperature: 25.0, humidity: 40.0 }).await?;
//!
//! let warm: Vec<Reading> = readings
//!     .find_many(Query::builder().field("temperature", Filter::gt(22)))
//!     .await?;
//! ```

use std::marker::PhantomData;

use crate::{
    document::{Document, DocumentExt},
    error::{DocumentStoreResult, ResultExt},
    query::Query,
    store::Database,
    update::Update,
    value::{SharedDocument, Value},
};

/// A typed view of a [`Database`].
#[derive(Debug)]
pub struct TypedCollection<'a, D: Document> {
    database: &'a Database,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> TypedCollection<'a, D> {
    pub(crate) fn new(database: &'a Database) -> Self {
        Self { database, _marker: PhantomData }
    }

    /// Switches to a different document type over the same database.
    pub fn with_type<T: Document>(&self) -> TypedCollection<'a, T> {
        TypedCollection::new(self.database)
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &'a Database {
        self.database
    }

    /// Inserts a document and returns it as stored.
    pub async fn insert_one(&self, document: &D) -> DocumentStoreResult<D> {
        let document = document
            .to_document()
            .context("Error inserting document")?;

        convert(self.database.insert_one(Value::Object(document)).await?)
    }

    /// Inserts several documents. Either all of them are inserted or none is.
    pub async fn insert_many(&self, documents: &[D]) -> DocumentStoreResult<Vec<D>> {
        let documents = documents
            .iter()
            .map(|document| document.to_document().map(Value::Object))
            .collect::<DocumentStoreResult<Vec<_>>>()
            .context("Error inserting documents")?;

        convert_all(self.database.insert_many(documents).await?)
    }

    pub async fn find_one(&self, query: impl Into<Query>) -> DocumentStoreResult<Option<D>> {
        self.database
            .find_one(query)
            .await?
            .map(convert)
            .transpose()
    }

    pub async fn find_many(&self, query: impl Into<Query>) -> DocumentStoreResult<Vec<D>> {
        convert_all(self.database.find_many(query).await?)
    }

    /// Updates the first match and returns it as it was before.
    pub async fn update_one(
        &self,
        query: impl Into<Query>,
        update: impl Into<Update>,
    ) -> DocumentStoreResult<Option<D>> {
        self.database
            .update_one(query, update)
            .await?
            .map(convert)
            .transpose()
    }

    /// Updates every match and returns them as they were before.
    pub async fn update_many(
        &self,
        query: impl Into<Query>,
        update: impl Into<Update>,
    ) -> DocumentStoreResult<Vec<D>> {
        convert_all(self.database.update_many(query, update).await?)
    }

    pub async fn delete_one(&self, query: impl Into<Query>) -> DocumentStoreResult<Option<D>> {
        self.database
            .delete_one(query)
            .await?
            .map(convert)
            .transpose()
    }

    pub async fn delete_many(&self, query: impl Into<Query>) -> DocumentStoreResult<Vec<D>> {
        convert_all(self.database.delete_many(query).await?)
    }

    pub async fn count(&self, query: impl Into<Query>) -> DocumentStoreResult<usize> {
        self.database.count(query).await
    }
}

fn convert<D: Document>(document: SharedDocument) -> DocumentStoreResult<D> {
    D::from_document(&document).context("Error converting document")
}

fn convert_all<D: Document>(documents: Vec<SharedDocument>) -> DocumentStoreResult<Vec<D>> {
    documents
        .into_iter()
        .map(convert)
        .collect()
}
