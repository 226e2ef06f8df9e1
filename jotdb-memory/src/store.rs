//! In-memory storage backend.
//!
//! Keeps the last persisted snapshot as text in process memory. Nothing survives the
//! process, but the snapshot outlives any single [`Database`](jotdb_core::store::Database):
//! a database built over a clone of the backend loads what another one persisted.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use tracing::trace;

use jotdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::DocumentStoreResult,
    format::EMPTY_STORAGE,
};

/// Thread-safe in-memory storage backend.
///
/// `InMemoryBackend` is cloneable and uses an `Arc`-wrapped internal state. Clones share
/// the same snapshot.
///
/// # Example
///
/// ```ignore
/// use jotdb_memory::InMemoryBackend;
/// use jotdb_core::store::Database;
///
/// let backend = InMemoryBackend::builder().build().await?;
/// let db = Database::builder().backend(backend.clone()).build().await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryBackend {
    /// The last persisted snapshot, if any.
    snapshot: Arc<RwLock<Option<String>>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a backend holding `contents` as if it had been persisted.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(contents.into()))),
        }
    }

    /// Creates a builder for constructing an `InMemoryBackend`.
    pub fn builder() -> InMemoryBackendBuilder {
        InMemoryBackendBuilder::default()
    }

    /// Returns the last persisted snapshot.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.read().clone()
    }
}

#[async_trait]
impl StoreBackend for InMemoryBackend {
    async fn load(&self) -> DocumentStoreResult<String> {
        Ok(self
            .snapshot
            .read()
            .clone()
            .unwrap_or_else(|| EMPTY_STORAGE.to_string()))
    }

    fn persist(&self, payload: String) -> BoxFuture<'_, DocumentStoreResult<()>> {
        trace!(bytes = payload.len(), "storing snapshot");
        *self.snapshot.write() = Some(payload);

        future::ready(Ok(())).boxed()
    }
}

/// Builder for [`InMemoryBackend`].
#[derive(Default, Debug)]
pub struct InMemoryBackendBuilder {
    contents: Option<String>,
}

impl InMemoryBackendBuilder {
    /// Starts the backend with existing storage text.
    pub fn contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryBackendBuilder {
    type Backend = InMemoryBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(match self.contents {
            Some(contents) => InMemoryBackend::with_contents(contents),
            None => InMemoryBackend::new(),
        })
    }
}
