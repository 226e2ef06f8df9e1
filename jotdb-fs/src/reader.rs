//! Storage file reader.

use std::{io::ErrorKind, path::Path};

use tokio::fs;
use tracing::debug;

use jotdb_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    format::EMPTY_STORAGE,
};

/// Reads the storage file at `path`.
///
/// A missing file is created, along with its directories, holding an empty array. A path
/// that exists but is not a regular file is invalid storage. Any other I/O failure is
/// returned as is.
pub async fn read_storage(path: &Path) -> DocumentStoreResult<String> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(fs::read_to_string(path).await?),
        Ok(_) => Err(DocumentStoreError::InvalidStorage(format!(
            "{} is not a file",
            path.display()
        ))),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }

            fs::write(path, EMPTY_STORAGE).await?;
            debug!(path = %path.display(), "created storage file");

            Ok(EMPTY_STORAGE.to_string())
        },
        Err(err) => Err(err.into()),
    }
}
