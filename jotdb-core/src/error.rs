//! Error types and result types for document store operations.
//!
//! Component functions (normalizer, update engine, parser, backends) return the plain
//! variants of [`DocumentStoreError`]. Every public [`Database`](crate::store::Database)
//! operation is a single failure boundary: it wraps whatever went wrong in
//! [`DocumentStoreError::Operation`] together with a human-readable context such as
//! `"Error inserting document"`. Use [`DocumentStoreError::root_cause`] to get back to the
//! original failure.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Boxed error produced by user-supplied hooks such as the schema validator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between JSON text, typed
    /// documents and the value model.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The database configuration is malformed.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document handed to the store, or produced by an update transform, is not an object.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The persisted storage does not have the expected shape (an array of objects).
    #[error("Invalid storage: {0}")]
    InvalidStorage(String),
    /// The schema validator rejected a document.
    #[error("Validation error: {0}")]
    Validation(#[source] BoxError),
    /// The underlying storage I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A store operation failed. `context` names the operation, `source` is the failure.
    #[error("{context}: {source}")]
    Operation {
        context: &'static str,
        #[source]
        source: Box<DocumentStoreError>,
    },
}

impl DocumentStoreError {
    /// Wraps this error with the context of the store operation it escaped from.
    pub fn with_context(self, context: &'static str) -> Self {
        DocumentStoreError::Operation { context, source: Box::new(self) }
    }

    /// Returns the innermost error, skipping any operation context.
    pub fn root_cause(&self) -> &DocumentStoreError {
        match self {
            DocumentStoreError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns `true` if the failure originated in the storage I/O layer.
    pub fn is_io(&self) -> bool {
        matches!(self.root_cause(), DocumentStoreError::Io(_))
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

/// Attaches operation context to a [`DocumentStoreResult`].
pub trait ResultExt<T> {
    /// Wraps the error, if any, with the given operation context.
    fn context(self, context: &'static str) -> DocumentStoreResult<T>;
}

impl<T> ResultExt<T> for DocumentStoreResult<T> {
    fn context(self, context: &'static str) -> DocumentStoreResult<T> {
        self.map_err(|err| err.with_context(context))
    }
}
