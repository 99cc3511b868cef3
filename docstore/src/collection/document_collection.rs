use itertools::Itertools;
use std::collections::HashMap;
use std::sync::Arc;

use super::{CollectionConfig, Document, PutResult, QueryParams};
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::index::FieldIndex;

/// A named set of documents keyed by the collection's primary-key field,
/// plus the secondary indexes kept over it.
///
/// `Collection` is a cheap handle: clones share the same documents and
/// indexes through an `Arc`, and every handle may be used from any thread.
///
/// # Locking
///
/// Each collection owns one reader/writer lock over its documents and
/// indexes together.
/// - `put`, `delete`, `create_index` and `delete_index` take it exclusively,
///   so a document change and the matching index changes are atomic.
/// - `get`, `list`, `query` and the other readers take it shared.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::QueryParams;
/// use docstore::doc;
/// use docstore::store::Store;
/// use docstore::collection::CollectionConfig;
///
/// # fn main() -> docstore::errors::DocStoreResult<()> {
/// let store = Store::new();
/// let users = store.create_collection("users", CollectionConfig::new("id")?)?;
///
/// assert!(users.put(doc! { "id": "u1", "city": "Odesa" }).is_stored());
/// assert!(users.put(doc! { "id": "u2", "city": "Kharkiv" }).is_stored());
///
/// users.create_index("city")?;
/// let by_city = users.query("city", &QueryParams::ascending())?;
/// assert_eq!(by_city[0].get_str("id"), Some("u2"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    config: CollectionConfig,
    state: Atomic<CollectionState>,
}

/// Everything guarded by a collection's lock.
#[derive(Default)]
pub(crate) struct CollectionState {
    pub(crate) documents: HashMap<String, Document>,
    pub(crate) indexes: HashMap<String, FieldIndex>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (documents, indexes) = self
            .inner
            .state
            .read_with(|state| (state.documents.len(), state.indexes.len()));

        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("primary_key", &self.primary_key())
            .field("documents", &documents)
            .field("indexes", &indexes)
            .finish()
    }
}

impl CollectionState {
    fn store(&mut self, key: &str, document: Document) -> PutResult {
        let previous = self.documents.remove(key);
        for index in self.indexes.values_mut() {
            if let Some(previous) = &previous {
                index.remove_document(key, previous);
            }
            index.add_document(key, &document);
        }
        self.documents.insert(key.to_string(), document);

        match previous {
            Some(_) => PutResult::Replaced,
            None => PutResult::Inserted,
        }
    }

    fn remove(&mut self, key: &str) -> Option<Document> {
        let removed = self.documents.remove(key)?;
        for index in self.indexes.values_mut() {
            index.remove_document(key, &removed);
        }
        Some(removed)
    }
}

impl Collection {
    pub(crate) fn new(name: &str, config: CollectionConfig) -> Self {
        Self::from_state(name, config, CollectionState::default())
    }

    pub(crate) fn from_state(name: &str, config: CollectionConfig, state: CollectionState) -> Self {
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                config,
                state: atomic(state),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.inner.config
    }

    pub fn primary_key(&self) -> &str {
        self.inner.config.primary_key()
    }

    /// Stores `document` under the value of its primary-key field.
    ///
    /// A document whose primary-key field is missing, not a string, or empty
    /// is not stored and the collection is left unchanged; the returned
    /// [`PutResult::Rejected`] names the reason. Otherwise any document with
    /// the same key is replaced and every index is brought up to date in the
    /// same critical section.
    pub fn put(&self, document: Document) -> PutResult {
        let key = match self.inner.config.key_of(&document) {
            Ok(key) => key.to_string(),
            Err(reason) => {
                log::debug!("Document rejected by collection '{}': {}", self.name(), reason);
                return PutResult::Rejected(reason);
            }
        };

        self.inner
            .state
            .write_with(|state| state.store(&key, document))
    }

    /// Returns a copy of the document stored under `key`.
    pub fn get(&self, key: &str) -> Option<Document> {
        self.inner
            .state
            .read_with(|state| state.documents.get(key).cloned())
    }

    /// Removes the document stored under `key` along with its index entries.
    ///
    /// Returns `false`, changing nothing, when no such document exists.
    pub fn delete(&self, key: &str) -> bool {
        self.inner
            .state
            .write_with(|state| state.remove(key))
            .is_some()
    }

    /// Returns copies of all documents, in no particular order.
    pub fn list(&self) -> Vec<Document> {
        self.inner
            .state
            .read_with(|state| state.documents.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.inner.state.read_with(|state| state.documents.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates an index over `field` and fills it from the current documents.
    ///
    /// Documents lacking the field, or holding a non-string value in it, are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `IndexAlreadyExists` if `field` is already indexed.
    pub fn create_index(&self, field: &str) -> DocStoreResult<()> {
        self.inner.state.write_with(|state| {
            if state.indexes.contains_key(field) {
                log::warn!("Index on '{}' already exists in collection '{}'", field, self.name());
                return Err(DocStoreError::new(
                    &format!("Index for field {} already exists", field),
                    ErrorKind::IndexAlreadyExists,
                ));
            }

            let index = FieldIndex::build(field, state.documents.iter());
            log::info!(
                "Created index on '{}' in collection '{}' with {} values",
                index.field(),
                self.name(),
                index.len()
            );
            state.indexes.insert(field.to_string(), index);
            Ok(())
        })
    }

    /// Removes the index over `field`. Documents are not touched.
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if `field` is not indexed.
    pub fn delete_index(&self, field: &str) -> DocStoreResult<()> {
        self.inner.state.write_with(|state| match state.indexes.remove(field) {
            Some(_) => {
                log::info!("Dropped index on '{}' in collection '{}'", field, self.name());
                Ok(())
            }
            None => Err(index_not_found(field)),
        })
    }

    pub fn has_index(&self, field: &str) -> bool {
        self.inner
            .state
            .read_with(|state| state.indexes.contains_key(field))
    }

    /// Names of the indexed fields, sorted.
    pub fn list_indexes(&self) -> Vec<String> {
        self.inner
            .state
            .read_with(|state| state.indexes.keys().cloned().sorted().collect())
    }

    /// Scans the index over `field` and returns the owning documents in scan
    /// order. See [`QueryParams`] for bound and direction rules.
    ///
    /// Each indexed value resolves to one primary key; a key with no live
    /// document is skipped.
    ///
    /// # Errors
    ///
    /// Returns `IndexNotFound` if `field` is not indexed.
    pub fn query(&self, field: &str, params: &QueryParams) -> DocStoreResult<Vec<Document>> {
        self.inner.state.read_with(|state| {
            let index = state
                .indexes
                .get(field)
                .ok_or_else(|| index_not_found(field))?;

            Ok(index
                .scan(params)
                .filter_map(|value| index.lookup(value))
                .filter_map(|key| state.documents.get(key))
                .cloned()
                .collect())
        })
    }

    pub(crate) fn read_state<R>(&self, f: impl FnOnce(&CollectionState) -> R) -> R {
        self.inner.state.read_with(f)
    }
}

fn index_not_found(field: &str) -> DocStoreError {
    log::warn!("No index found on field '{}'", field);
    DocStoreError::new(
        &format!("Index for field {} doesn't exist", field),
        ErrorKind::IndexNotFound,
    )
}
