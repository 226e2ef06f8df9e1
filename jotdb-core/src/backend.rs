//! Storage backend abstraction for the database.
//!
//! A backend moves the serialized document sequence in and out of durable (or not so
//! durable) storage. It knows nothing about documents: [`StoreBackend::load`] returns the
//! raw storage text and [`StoreBackend::persist`] receives a complete snapshot. Parsing,
//! validation and serialization stay in [`crate::store::Database`].
//!
//! # Traits
//!
//! - [`StoreBackend`]: the core trait for storage backends
//! - [`StoreBackendBuilder`]: factory trait for creating backend instances

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::Debug;

use crate::error::DocumentStoreResult;

/// Abstract interface for storage backends.
///
/// # Ordering
///
/// Snapshots must reach storage in the order [`persist`](StoreBackend::persist) was
/// called, which is the order they were taken in. Implementations therefore accept the
/// payload synchronously, before returning the future, and only use the future to report
/// completion. A backend may coalesce: a snapshot submitted while an earlier one is still
/// being written can replace any snapshot queued behind it, since the later one supersedes
/// it. The future of a replaced snapshot resolves with the outcome of the write of the
/// snapshot that replaced it.
///
/// # Thread Safety
///
/// Implementations are shared across tasks and must be `Send + Sync`.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Reads the persisted storage text. An empty store reads as `[]`.
    async fn load(&self) -> DocumentStoreResult<String>;

    /// Submits a snapshot for storage and returns a future resolving once it is stored,
    /// or superseded.
    fn persist(&self, payload: String) -> BoxFuture<'_, DocumentStoreResult<()>>;
}

/// Factory for backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
