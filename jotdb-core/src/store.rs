//! The database: an ordered, in-memory sequence of documents with optional persistence.
//!
//! Every mutation takes the document lock, computes and validates its result, commits it,
//! and hands a snapshot of the whole sequence to the backend before releasing the lock.
//! The write itself is awaited after the lock is released, so other operations can run
//! while it is in flight; the backend coalesces the snapshots they produce.
//!
//! # Example
//!
//! ```ignore
//! use jotdb_core::{query::{Filter, Query}, store::Database};
//! use serde_json::json;
//!
//! let db = Database::new();
//! db.insert_one(json!({ "temperature": 20, "humidity": 50 })).await?;
//! db.insert_one(json!({ "temperature": 25, "humidity": 40 })).await?;
//!
//! let warm = db
//!     .find_many(Query::builder().field("temperature", Filter::gt(22)))
//!     .await?;
//! assert_eq!(warm.len(), 1);
//! ```

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use mea::rwlock::RwLock;
use tracing::{debug, trace};

use crate::{
    backend::StoreBackend,
    collection::TypedCollection,
    config::{DatabaseConfig, ResolvedConfig, SchemaValidator},
    document::Document,
    error::{BoxError, DocumentStoreError, DocumentStoreResult, ResultExt},
    evaluator::search,
    format,
    normalize::normalize_document,
    query::Query,
    update::{Update, apply_update},
    value::{Map, SharedDocument, Value},
};

type Completion<'a> = BoxFuture<'a, DocumentStoreResult<()>>;

/// An embedded document database.
pub struct Database {
    documents: RwLock<Vec<SharedDocument>>,
    backend: Option<Box<dyn StoreBackend>>,
    config: ResolvedConfig,
    validator: Option<SchemaValidator>,
}

impl Database {
    /// Creates an empty, memory-only database with the default configuration.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            backend: None,
            config: ResolvedConfig {
                pretty: true,
                immutable: true,
                only_in_memory: true,
            },
            validator: None,
        }
    }

    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// Returns a view of this database working with `D` instead of raw documents.
    pub fn typed<D: Document>(&self) -> TypedCollection<'_, D> {
        TypedCollection::new(self)
    }

    /// Inserts one document and returns it as stored.
    ///
    /// # Errors
    ///
    /// Fails if `document` is not an object, if the schema validator rejects it, or if
    /// persisting fails. In the first two cases nothing is inserted.
    pub async fn insert_one(&self, document: impl Into<Value>) -> DocumentStoreResult<SharedDocument> {
        self.insert_documents(vec![document.into()])
            .await
            .map(|mut inserted| inserted.remove(0))
            .context("Error inserting document")
    }

    /// Inserts several documents. Either all of them are inserted or none is.
    pub async fn insert_many<I, V>(&self, documents: I) -> DocumentStoreResult<Vec<SharedDocument>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert_documents(documents.into_iter().map(Into::into).collect())
            .await
            .context("Error inserting documents")
    }

    /// Returns the first document matching `query`.
    pub async fn find_one(&self, query: impl Into<Query>) -> DocumentStoreResult<Option<SharedDocument>> {
        let query = query.into();
        let documents = self.documents.read().await;

        let found = if query.is_empty() {
            documents.first()
        } else {
            search(&query, documents.as_slice())
                .first()
                .map(|&position| &documents[position])
        };

        Ok(found.map(|document| self.output(document)))
    }

    /// Returns every document matching `query`, in storage order.
    pub async fn find_many(&self, query: impl Into<Query>) -> DocumentStoreResult<Vec<SharedDocument>> {
        let query = query.into();
        let documents = self.documents.read().await;

        let found = if query.is_empty() {
            documents
                .iter()
                .map(|document| self.output(document))
                .collect::<Vec<_>>()
        } else {
            search(&query, documents.as_slice())
                .into_iter()
                .map(|position| self.output(&documents[position]))
                .collect::<Vec<_>>()
        };

        trace!(found = found.len(), "find");
        Ok(found)
    }

    /// Updates the first document matching `query` and returns it as it was before.
    pub async fn update_one(
        &self,
        query: impl Into<Query>,
        update: impl Into<Update>,
    ) -> DocumentStoreResult<Option<SharedDocument>> {
        self.update_documents(query.into(), update.into(), false)
            .await
            .map(|originals| originals.into_iter().next())
            .context("Error updating document")
    }

    /// Updates every document matching `query` and returns them as they were before.
    ///
    /// Every replacement is computed and validated before the first one is committed; if
    /// any fails, nothing changes.
    pub async fn update_many(
        &self,
        query: impl Into<Query>,
        update: impl Into<Update>,
    ) -> DocumentStoreResult<Vec<SharedDocument>> {
        self.update_documents(query.into(), update.into(), true)
            .await
            .context("Error updating documents")
    }

    /// Removes the first document matching `query` and returns it.
    pub async fn delete_one(&self, query: impl Into<Query>) -> DocumentStoreResult<Option<SharedDocument>> {
        self.delete_documents(query.into(), false)
            .await
            .map(|removed| removed.into_iter().next())
            .context("Error deleting document")
    }

    /// Removes every document matching `query` and returns them in storage order.
    pub async fn delete_many(&self, query: impl Into<Query>) -> DocumentStoreResult<Vec<SharedDocument>> {
        self.delete_documents(query.into(), true)
            .await
            .context("Error deleting documents")
    }

    /// Counts the documents matching `query`.
    pub async fn count(&self, query: impl Into<Query>) -> DocumentStoreResult<usize> {
        let query = query.into();
        let documents = self.documents.read().await;

        if query.is_empty() {
            return Ok(documents.len());
        }

        Ok(search(&query, documents.as_slice()).len())
    }

    /// Removes every document.
    pub async fn drop(&self) -> DocumentStoreResult<()> {
        async {
            let mut documents = self.documents.write().await;
            documents.clear();

            let completion = self.submit(documents.as_slice())?;
            std::mem::drop(documents);

            complete(completion).await
        }
        .await
        .context("Error dropping database")
    }

    /// Replaces the documents with the backend contents. Every loaded document goes
    /// through the schema validator. Without a backend this does nothing.
    pub async fn load(&self) -> DocumentStoreResult<()> {
        self.load_documents()
            .await
            .context("Error loading documents")
    }

    /// Writes the current documents to the backend, even when the database is
    /// memory-only. Without a backend this does nothing.
    pub async fn save(&self) -> DocumentStoreResult<()> {
        async {
            let Some(backend) = &self.backend else {
                return Ok(());
            };

            let documents = self.documents.read().await;
            let payload = format::serialize(documents.as_slice(), self.config.pretty)?;
            debug!(documents = documents.len(), bytes = payload.len(), "saving documents");

            let completion = backend.persist(payload);
            std::mem::drop(documents);

            completion.await
        }
        .await
        .context("Error saving documents")
    }

    async fn insert_documents(&self, values: Vec<Value>) -> DocumentStoreResult<Vec<SharedDocument>> {
        let prepared = values
            .into_iter()
            .map(|value| {
                let document = normalize_document(value)?;
                self.validate(&document)?;
                Ok(Arc::new(document))
            })
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let mut documents = self.documents.write().await;
        documents.extend(prepared.iter().cloned());
        trace!(inserted = prepared.len(), total = documents.len(), "insert");

        let completion = self.submit(documents.as_slice())?;
        std::mem::drop(documents);

        complete(completion).await?;

        Ok(prepared
            .iter()
            .map(|document| self.output(document))
            .collect())
    }

    async fn update_documents(
        &self,
        query: Query,
        update: Update,
        many: bool,
    ) -> DocumentStoreResult<Vec<SharedDocument>> {
        let mut documents = self.documents.write().await;

        let mut positions = search(&query, documents.as_slice());
        if !many {
            positions.truncate(1);
        }

        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let replacements = positions
            .into_iter()
            .map(|position| {
                let updated = apply_update(&documents[position], &update)?;
                self.validate(&updated)?;
                Ok((position, Arc::new(updated)))
            })
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        // Replaced documents are no longer reachable from the store.
        let originals = replacements
            .into_iter()
            .map(|(position, updated)| std::mem::replace(&mut documents[position], updated))
            .collect::<Vec<_>>();
        trace!(updated = originals.len(), "update");

        let completion = self.submit(documents.as_slice())?;
        std::mem::drop(documents);

        complete(completion).await?;

        Ok(originals)
    }

    async fn delete_documents(&self, query: Query, many: bool) -> DocumentStoreResult<Vec<SharedDocument>> {
        let mut documents = self.documents.write().await;

        let mut positions = search(&query, documents.as_slice());
        if !many {
            positions.truncate(1);
        }

        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let mut targets = positions.into_iter().peekable();
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(documents.len());

        for (position, document) in std::mem::take(&mut *documents).into_iter().enumerate() {
            if targets.next_if_eq(&position).is_some() {
                removed.push(document);
            } else {
                kept.push(document);
            }
        }

        *documents = kept;
        trace!(deleted = removed.len(), remaining = documents.len(), "delete");

        let completion = self.submit(documents.as_slice())?;
        std::mem::drop(documents);

        complete(completion).await?;

        Ok(removed)
    }

    async fn load_documents(&self) -> DocumentStoreResult<()> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let raw = backend.load().await?;
        let loaded = format::parse(&raw)?
            .into_iter()
            .map(|document| {
                self.validate(&document)?;
                Ok(Arc::new(document))
            })
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        debug!(documents = loaded.len(), "loaded documents");
        *self.documents.write().await = loaded;

        Ok(())
    }

    fn validate(&self, document: &Map) -> DocumentStoreResult<()> {
        match &self.validator {
            Some(validator) => validator(document).map_err(DocumentStoreError::Validation),
            None => Ok(()),
        }
    }

    fn output(&self, document: &SharedDocument) -> SharedDocument {
        if self.config.immutable {
            Arc::new(Map::clone(document))
        } else {
            Arc::clone(document)
        }
    }

    /// Hands a snapshot to the backend. Must be called while the document lock is held
    /// so snapshots are submitted in the order they were taken.
    fn submit(&self, documents: &[SharedDocument]) -> DocumentStoreResult<Option<Completion<'_>>> {
        let Some(backend) = self.backend.as_ref().filter(|_| !self.config.only_in_memory) else {
            return Ok(None);
        };

        let payload = format::serialize(documents, self.config.pretty)?;
        debug!(documents = documents.len(), bytes = payload.len(), "persisting snapshot");

        Ok(Some(backend.persist(payload)))
    }
}

async fn complete(completion: Option<Completion<'_>>) -> DocumentStoreResult<()> {
    match completion {
        Some(completion) => completion.await,
        None => Ok(()),
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Database`].
#[derive(Default)]
pub struct DatabaseBuilder {
    backend: Option<Box<dyn StoreBackend>>,
    config: DatabaseConfig,
    validator: Option<SchemaValidator>,
}

impl DatabaseBuilder {
    /// Sets the storage backend.
    pub fn backend(mut self, backend: impl StoreBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn autoload(mut self, autoload: bool) -> Self {
        self.config.autoload = autoload;
        self
    }

    pub fn immutable(mut self, immutable: bool) -> Self {
        self.config.immutable = immutable;
        self
    }

    pub fn only_in_memory(mut self, only_in_memory: bool) -> Self {
        self.config.only_in_memory = Some(only_in_memory);
        self
    }

    /// Sets the schema validator.
    pub fn schema_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Map) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Builds the database, loading the backend contents when `autoload` is set.
    ///
    /// # Errors
    ///
    /// Fails with [`DocumentStoreError::Initialization`] when persistence is requested
    /// without a backend, and with the load error when autoloading fails.
    pub async fn build(self) -> DocumentStoreResult<Database> {
        let only_in_memory = match (self.config.only_in_memory, &self.backend) {
            (Some(false), None) => {
                return Err(DocumentStoreError::Initialization(
                    "only_in_memory can only be disabled when a storage backend is set".to_string(),
                ));
            },
            (Some(only_in_memory), _) => only_in_memory,
            (None, backend) => backend.is_none(),
        };

        let autoload = self.config.autoload && self.backend.is_some();
        let database = Database {
            documents: RwLock::new(Vec::new()),
            backend: self.backend,
            config: ResolvedConfig {
                pretty: self.config.pretty,
                immutable: self.config.immutable,
                only_in_memory,
            },
            validator: self.validator,
        };

        if autoload {
            database.load().await?;
        }

        Ok(database)
    }
}

impl fmt::Debug for DatabaseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseBuilder")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::future::{self, FutureExt};
    use serde_json::json;

    use super::*;
    use crate::query::Filter;

    /// Records every persisted payload and serves a fixed text on load.
    #[derive(Debug, Default, Clone)]
    struct RecordingBackend {
        stored: Arc<Mutex<String>>,
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingBackend {
        fn with_contents(contents: &str) -> Self {
            let backend = Self::default();
            *backend.stored.lock().unwrap() = contents.to_string();
            backend
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StoreBackend for RecordingBackend {
        async fn load(&self) -> DocumentStoreResult<String> {
            let stored = self.stored.lock().unwrap().clone();
            Ok(if stored.is_empty() { format::EMPTY_STORAGE.to_string() } else { stored })
        }

        fn persist(&self, payload: String) -> Completion<'_> {
            self.writes.lock().unwrap().push(payload.clone());
            *self.stored.lock().unwrap() = payload;
            future::ready(Ok(())).boxed()
        }
    }

    fn weather_query() -> Query {
        Query::builder()
            .field("temperature", Filter::gt(22))
            .build()
    }

    #[tokio::test]
    async fn insert_find_delete() {
        let db = Database::new();

        db.insert_one(json!({ "temperature": 20, "humidity": 50 })).await.unwrap();
        db.insert_one(json!({ "temperature": 25, "humidity": 40 })).await.unwrap();

        let warm = db.find_many(weather_query()).await.unwrap();
        assert_eq!(warm.len(), 1);
        assert_eq!(Value::from(Map::clone(&warm[0])), Value::from(json!({ "temperature": 25, "humidity": 40 })));

        let removed = db.delete_one(Query::new()).await.unwrap().unwrap();
        assert_eq!(Value::from(Map::clone(&removed)), Value::from(json!({ "temperature": 20, "humidity": 50 })));

        let rest = db.find_many(Query::new()).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(Value::from(Map::clone(&rest[0])), Value::from(json!({ "temperature": 25, "humidity": 40 })));
    }

    #[tokio::test]
    async fn rejects_non_objects_with_context() {
        let db = Database::new();

        let err = db.insert_one(json!([1, 2])).await.unwrap_err();

        assert_eq!(err.to_string(), "Error inserting document: Invalid document: Document must be an object");
        assert_eq!(db.count(Query::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_many_is_all_or_nothing() {
        let db = Database::new();

        let err = db
            .insert_many(vec![json!({ "a": 1 }), json!("nope"), json!({ "a": 2 })])
            .await
            .unwrap_err();

        assert!(matches!(err.root_cause(), DocumentStoreError::InvalidDocument(_)));
        assert_eq!(db.count(Query::new()).await.unwrap(), 0);

        let inserted = db.insert_many(vec![json!({ "a": 1 }), json!({ "a": 2 })]).await.unwrap();
        assert_eq!(inserted.len(), 2);
    }

    #[tokio::test]
    async fn immutable_mode_returns_copies() {
        let db = Database::new();
        let inserted = db.insert_one(json!({ "a": 1 })).await.unwrap();
        let found = db.find_one(Query::new()).await.unwrap().unwrap();

        assert!(!Arc::ptr_eq(&inserted, &found));
    }

    #[tokio::test]
    async fn direct_mode_shares_documents() {
        let db = Database::builder().immutable(false).build().await.unwrap();
        let inserted = db.insert_one(json!({ "a": 1 })).await.unwrap();
        let found = db.find_one(json_query(json!({ "a": 1 }))).await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&inserted, &found));
    }

    fn json_query(json: serde_json::Value) -> Query {
        Value::from(json)
            .as_object()
            .cloned()
            .map(Query::from)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn update_returns_originals_and_keeps_positions() {
        let db = Database::new();
        db.insert_many(vec![
            json!({ "n": 1, "tag": "x" }),
            json!({ "n": 2, "tag": "y" }),
            json!({ "n": 3, "tag": "x" }),
        ])
        .await
        .unwrap();

        let originals = db
            .update_many(
                json_query(json!({ "tag": "x" })),
                Update::builder().with("n", |v| Value::from(v.as_f64().unwrap_or(0.0) * 10.0)),
            )
            .await
            .unwrap();

        assert_eq!(originals.len(), 2);
        assert_eq!(originals[0].get("n"), Some(&Value::from(1)));

        let all = db.find_many(Query::new()).await.unwrap();
        let ns = all
            .iter()
            .map(|doc| doc.get("n").and_then(Value::as_f64).unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(ns, vec![10.0, 2.0, 30.0]);
    }

    #[tokio::test]
    async fn update_one_touches_only_the_first_match() {
        let db = Database::new();
        db.insert_many(vec![json!({ "k": 1 }), json!({ "k": 1 })]).await.unwrap();

        let original = db
            .update_one(json_query(json!({ "k": 1 })), Update::builder().set("k", 2))
            .await
            .unwrap();

        assert!(original.is_some());
        assert_eq!(db.count(json_query(json!({ "k": 2 }))).await.unwrap(), 1);
        assert!(db.update_one(json_query(json!({ "k": 9 })), Update::builder().set("k", 3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_update_commits_nothing() {
        let db = Database::new();
        db.insert_many(vec![json!({ "n": 1 }), json!({ "n": 2 })]).await.unwrap();

        let err = db
            .update_many(Query::new(), Update::document(|doc| {
                if doc.get("n").as_f64() == Some(2.0) { Value::from(0) } else { doc }
            }))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Error updating documents"));
        assert_eq!(db.count(json_query(json!({ "n": 1 }))).await.unwrap(), 1);
        assert_eq!(db.count(json_query(json!({ "n": 2 }))).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn validator_rejections_are_not_committed() {
        let db = Database::builder()
            .schema_validator(|doc| match doc.get("name") {
                Some(Value::String(_)) => Ok(()),
                _ => Err("name must be a string".into()),
            })
            .build()
            .await
            .unwrap();

        db.insert_one(json!({ "name": "ok" })).await.unwrap();
        let err = db.insert_one(json!({ "name": 5 })).await.unwrap_err();
        assert!(matches!(err.root_cause(), DocumentStoreError::Validation(_)));

        let err = db
            .update_one(Query::new(), Update::builder().unset("name"))
            .await
            .unwrap_err();
        assert!(matches!(err.root_cause(), DocumentStoreError::Validation(_)));

        let all = db.find_many(Query::new()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].get("name"), Some(&Value::from("ok")));
    }

    #[tokio::test]
    async fn delete_many_compacts_in_order() {
        let db = Database::new();
        db.insert_many((0..6).map(|n| json!({ "n": n, "even": n % 2 == 0 }))).await.unwrap();

        let removed = db.delete_many(json_query(json!({ "even": true }))).await.unwrap();
        let removed = removed
            .iter()
            .filter_map(|doc| doc.get("n").and_then(Value::as_f64))
            .collect::<Vec<_>>();
        assert_eq!(removed, vec![0.0, 2.0, 4.0]);

        let rest = db
            .find_many(Query::new())
            .await
            .unwrap()
            .iter()
            .filter_map(|doc| doc.get("n").and_then(Value::as_f64))
            .collect::<Vec<_>>();
        assert_eq!(rest, vec![1.0, 3.0, 5.0]);
    }

    #[tokio::test]
    async fn mutations_persist_snapshots() {
        let backend = RecordingBackend::default();
        let db = Database::builder()
            .backend(backend.clone())
            .pretty(false)
            .build()
            .await
            .unwrap();

        db.insert_one(json!({ "a": 1 })).await.unwrap();
        db.update_one(Query::new(), Update::builder().set("a", 2)).await.unwrap();
        db.delete_many(json_query(json!({ "a": 5 }))).await.unwrap();
        db.delete_one(Query::new()).await.unwrap();

        assert_eq!(backend.writes(), vec![r#"[{"a":1}]"#, r#"[{"a":2}]"#, "[]"]);
    }

    #[tokio::test]
    async fn memory_only_never_persists_implicitly() {
        let backend = RecordingBackend::with_contents(r#"[{"a":1}]"#);
        let db = Database::builder()
            .backend(backend.clone())
            .only_in_memory(true)
            .pretty(false)
            .build()
            .await
            .unwrap();

        assert_eq!(db.count(Query::new()).await.unwrap(), 1);

        db.insert_one(json!({ "b": 2 })).await.unwrap();
        db.drop().await.unwrap();
        assert!(backend.writes().is_empty());

        db.save().await.unwrap();
        assert_eq!(backend.writes(), vec!["[]"]);
    }

    #[tokio::test]
    async fn load_replaces_and_validates() {
        let backend = RecordingBackend::with_contents(r#"[{"a":1},{"a":"x"}]"#);
        let err = Database::builder()
            .backend(backend.clone())
            .schema_validator(|doc| match doc.get("a") {
                Some(Value::Number(_)) => Ok(()),
                _ => Err("a must be a number".into()),
            })
            .build()
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Error loading documents"));
        assert!(matches!(err.root_cause(), DocumentStoreError::Validation(_)));

        let db = Database::builder()
            .backend(backend)
            .autoload(false)
            .build()
            .await
            .unwrap();
        assert_eq!(db.count(Query::new()).await.unwrap(), 0);

        db.load().await.unwrap();
        assert_eq!(db.count(Query::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalid_storage_fails_the_load() {
        let backend = RecordingBackend::with_contents(r#"{"a":1}"#);
        let err = Database::builder().backend(backend).build().await.unwrap_err();

        assert!(matches!(err.root_cause(), DocumentStoreError::InvalidStorage(_)));
    }

    #[tokio::test]
    async fn persistence_requires_a_backend() {
        let err = Database::builder()
            .only_in_memory(false)
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentStoreError::Initialization(_)));
    }

    #[tokio::test]
    async fn count_fast_path_and_query() {
        let db = Database::new();
        db.insert_many(vec![json!({ "t": 1 }), json!({ "t": 30 }), json!({ "t": 40 })]).await.unwrap();

        assert_eq!(db.count(Query::new()).await.unwrap(), 3);
        assert_eq!(db.count(Query::builder().field("t", Filter::gte(30))).await.unwrap(), 2);
    }
}
