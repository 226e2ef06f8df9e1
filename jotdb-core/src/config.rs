//! Database configuration.

use std::sync::Arc;

use serde::Deserialize;

use crate::{error::BoxError, value::Map};

/// Schema hook run on every document before it is committed, and on every document read
/// by a load. Returning an error rejects the document.
pub type SchemaValidator = Arc<dyn Fn(&Map) -> Result<(), BoxError> + Send + Sync>;

/// Options for a [`Database`](crate::store::Database).
///
/// Every field has a default, so a partial configuration deserializes:
///
/// ```ignore
/// let config: DatabaseConfig = serde_json::from_str(r#"{ "pretty": false }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Write the storage file tab-indented.
    pub pretty: bool,
    /// Load the backend contents when the database is built.
    pub autoload: bool,
    /// Hand out deep copies. When `false`, shared handles to the stored documents are
    /// returned instead.
    pub immutable: bool,
    /// Never persist. Defaults to `true` without a backend and `false` with one.
    pub only_in_memory: Option<bool>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            autoload: true,
            immutable: true,
            only_in_memory: None,
        }
    }
}

/// Configuration after defaults that depend on the backend were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub(crate) pretty: bool,
    pub(crate) immutable: bool,
    pub(crate) only_in_memory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DatabaseConfig::default();

        assert!(config.pretty);
        assert!(config.autoload);
        assert!(config.immutable);
        assert_eq!(config.only_in_memory, None);
    }

    #[test]
    fn partial_config_deserializes() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{ "pretty": false, "only_in_memory": true }"#).unwrap();

        assert_eq!(
            config,
            DatabaseConfig {
                pretty: false,
                only_in_memory: Some(true),
                ..DatabaseConfig::default()
            }
        );
    }
}
