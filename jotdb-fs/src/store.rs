//! File storage backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::{TryFutureExt, future::BoxFuture, FutureExt};

use jotdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::{reader::read_storage, writer::AtomicWriter};

/// Stores the documents in a single JSON file.
///
/// Loads go through [`read_storage`]; every snapshot goes through an [`AtomicWriter`],
/// so the file is replaced atomically and snapshots submitted during a write coalesce.
/// Clones share the writer.
///
/// Writes run on the current Tokio runtime. Persisting outside one fails with an I/O
/// error and leaves the file untouched.
///
/// # Example
///
/// ```ignore
/// use jotdb_core::{backend::StoreBackendBuilder, store::Database};
/// use jotdb_fs::FileBackend;
///
/// let backend = FileBackend::builder("data/weather.json").build().await?;
/// let db = Database::builder().backend(backend).build().await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    writer: AtomicWriter,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicWriter::new(path),
        }
    }

    pub fn builder(path: impl Into<PathBuf>) -> FileBackendBuilder {
        FileBackendBuilder::new(path)
    }

    /// The storage file.
    pub fn path(&self) -> &Path {
        self.writer.path()
    }
}

#[async_trait]
impl StoreBackend for FileBackend {
    async fn load(&self) -> DocumentStoreResult<String> {
        read_storage(self.path()).await
    }

    fn persist(&self, payload: String) -> BoxFuture<'_, DocumentStoreResult<()>> {
        self.writer
            .write(payload)
            .map_err(DocumentStoreError::from)
            .boxed()
    }
}

/// Builder for [`FileBackend`].
#[derive(Debug)]
pub struct FileBackendBuilder {
    path: PathBuf,
}

impl FileBackendBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StoreBackendBuilder for FileBackendBuilder {
    type Backend = FileBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        if self.path.as_os_str().is_empty() || self.path.file_name().is_none() {
            return Err(DocumentStoreError::Initialization(format!(
                "invalid storage path {:?}",
                self.path
            )));
        }

        Ok(FileBackend::new(self.path))
    }
}
