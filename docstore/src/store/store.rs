use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::snapshot::{CollectionSnapshot, StoreSnapshot};
use super::{StoreBuilder, StoreConfig};
use crate::collection::{Collection, CollectionConfig};
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// Registry of named collections.
///
/// `Store` is a cheap handle; clones share one registry. Registry operations
/// are serialized by a reader/writer lock over the name-to-collection map,
/// while each collection keeps its own lock for document work.
///
/// # Snapshots
///
/// [`dump`](Self::dump) and [`load`](Self::load) convert the whole store,
/// including index state, to and from JSON bytes. The caller must make sure no
/// mutation is in flight while dumping; each collection is captured under its
/// own read lock, not the store as a whole.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::CollectionConfig;
/// use docstore::doc;
/// use docstore::store::Store;
///
/// # fn main() -> docstore::errors::DocStoreResult<()> {
/// let store = Store::new();
/// let users = store.create_collection("users", CollectionConfig::new("id")?)?;
/// let _ = users.put(doc! { "id": "u1", "name": "Ann" });
///
/// let bytes = store.dump()?;
/// let copy = Store::load(&bytes)?;
/// assert_eq!(copy.get_collection("users").and_then(|c| c.get("u1")), users.get("u1"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    config: StoreConfig,
    collections: Atomic<BTreeMap<String, Collection>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.inner.config)
            .field("collections", &self.collection_names())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::new())
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn with_config(config: StoreConfig) -> Self {
        Self::from_collections(config, BTreeMap::new())
    }

    fn from_collections(config: StoreConfig, collections: BTreeMap<String, Collection>) -> Self {
        Store {
            inner: Arc::new(StoreInner {
                config,
                collections: atomic(collections),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Registers a new, empty collection.
    ///
    /// # Errors
    ///
    /// Returns `CollectionAlreadyExists` if `name` is taken; the existing
    /// collection is left untouched.
    pub fn create_collection(&self, name: &str, config: CollectionConfig) -> DocStoreResult<Collection> {
        self.inner.collections.write_with(|collections| {
            if collections.contains_key(name) {
                log::warn!("Collection '{}' already exists", name);
                return Err(DocStoreError::new(
                    &format!("Collection {} already exists", name),
                    ErrorKind::CollectionAlreadyExists,
                ));
            }

            let collection = Collection::new(name, config);
            collections.insert(name.to_string(), collection.clone());
            log::info!("Collection '{}' created", name);
            Ok(collection)
        })
    }

    /// Returns a handle to the collection named `name`.
    pub fn get_collection(&self, name: &str) -> Option<Collection> {
        let collection = self
            .inner
            .collections
            .read_with(|collections| collections.get(name).cloned());
        if collection.is_none() {
            log::warn!("Collection '{}' not found", name);
        }
        collection
    }

    /// Unregisters the collection named `name`.
    ///
    /// Handles obtained earlier keep working but are no longer reachable
    /// through the store or included in its snapshots.
    pub fn delete_collection(&self, name: &str) -> bool {
        let removed = self
            .inner
            .collections
            .write_with(|collections| collections.remove(name))
            .is_some();
        if removed {
            log::info!("Collection '{}' deleted", name);
        } else {
            log::warn!("Collection '{}' not found for deletion", name);
        }
        removed
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner
            .collections
            .read_with(|collections| collections.contains_key(name))
    }

    /// Names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner
            .collections
            .read_with(|collections| collections.keys().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.inner.collections.read_with(|collections| collections.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes every collection, its documents and its indexes to JSON.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` if a document holds a value JSON cannot carry,
    /// such as a non-finite number.
    pub fn dump(&self) -> DocStoreResult<Vec<u8>> {
        let snapshot = self.snapshot();
        let bytes = if self.inner.config.pretty_snapshot() {
            serde_json::to_vec_pretty(&snapshot)
        } else {
            serde_json::to_vec(&snapshot)
        };

        match bytes {
            Ok(bytes) => {
                log::info!(
                    "Store dumped: {} collections, {} bytes",
                    snapshot.collections.len(),
                    bytes.len()
                );
                Ok(bytes)
            }
            Err(e) => {
                log::error!("Failed to dump store: {}", e);
                Err(e.into())
            }
        }
    }

    /// Rebuilds a store from bytes produced by [`dump`](Self::dump).
    ///
    /// Either the whole store loads or an error is returned; nothing partial
    /// is handed back.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` for bytes that are not a snapshot and
    /// `SnapshotCorrupted` for a snapshot that breaks a store invariant.
    pub fn load(bytes: &[u8]) -> DocStoreResult<Store> {
        Self::decode(bytes, StoreConfig::new())
    }

    pub(crate) fn decode(bytes: &[u8], config: StoreConfig) -> DocStoreResult<Store> {
        let snapshot: StoreSnapshot = serde_json::from_slice(bytes).map_err(|e| {
            log::error!("Failed to decode store snapshot: {}", e);
            DocStoreError::new_with_cause(
                "Failed to decode store snapshot",
                ErrorKind::EncodingError,
                e.into(),
            )
        })?;

        let mut collections = BTreeMap::new();
        for (name, collection) in snapshot.collections {
            let collection = collection.restore(&name)?;
            collections.insert(name, collection);
        }

        log::info!("Store loaded: {} collections", collections.len());
        Ok(Self::from_collections(config, collections))
    }

    /// Writes [`dump`](Self::dump) output to `path`, replacing the file.
    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> DocStoreResult<()> {
        let path = path.as_ref();
        let bytes = self.dump()?;
        std::fs::write(path, bytes).map_err(|e| {
            log::error!("Failed to write snapshot to {}: {}", path.display(), e);
            DocStoreError::from(e)
        })
    }

    /// Reads a snapshot file written by [`dump_to_file`](Self::dump_to_file).
    pub fn load_from_file(path: impl AsRef<Path>) -> DocStoreResult<Store> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::load(&bytes)
    }

    /// Writes a snapshot to the configured snapshot path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the store has no snapshot path.
    pub fn save(&self) -> DocStoreResult<()> {
        match self.inner.config.snapshot_path() {
            Some(path) => self.dump_to_file(path),
            None => {
                log::error!("Cannot save store without a snapshot path");
                Err(DocStoreError::new(
                    "No snapshot path configured",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn snapshot(&self) -> StoreSnapshot {
        // capture outside the registry lock so collection locks are never
        // taken while it is held
        let collections = self
            .inner
            .collections
            .read_with(|collections| collections.clone());

        StoreSnapshot {
            collections: collections
                .iter()
                .map(|(name, collection)| (name.clone(), CollectionSnapshot::capture(collection)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{FieldValue, QueryParams};
    use crate::doc;

    fn config(primary_key: &str) -> CollectionConfig {
        CollectionConfig::new(primary_key).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = Store::new();
        assert!(store.is_empty());
        assert!(store.collection_names().is_empty());
    }

    #[test]
    fn create_collection_registers_shared_handle() {
        let store = Store::new();
        let created = store.create_collection("users", config("id")).unwrap();
        let _ = created.put(doc! { "id": "u1" });

        let fetched = store.get_collection("users").unwrap();
        assert_eq!(fetched.len(), 1);
        assert!(store.has_collection("users"));
    }

    #[test]
    fn create_duplicate_collection_fails_and_keeps_original() {
        let store = Store::new();
        let original = store.create_collection("users", config("id")).unwrap();
        let _ = original.put(doc! { "id": "u1" });

        let err = store.create_collection("users", config("email")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CollectionAlreadyExists);

        let kept = store.get_collection("users").unwrap();
        assert_eq!(kept.primary_key(), "id");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn get_missing_collection() {
        assert!(Store::new().get_collection("nope").is_none());
    }

    #[test]
    fn delete_collection() {
        let store = Store::new();
        store.create_collection("users", config("id")).unwrap();
        assert!(store.delete_collection("users"));
        assert!(!store.has_collection("users"));
        assert!(!store.delete_collection("users"));
    }

    #[test]
    fn collection_names_are_sorted() {
        let store = Store::new();
        for name in ["b", "c", "a"] {
            store.create_collection(name, config("id")).unwrap();
        }
        assert_eq!(store.collection_names(), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn dump_layout() {
        let store = Store::new();
        let col = store.create_collection("c", config("key1")).unwrap();
        let _ = col.put(doc! { "key1": "k", "val": "v" });
        col.create_index("val").unwrap();

        let bytes = store.dump().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let collection = &json["collections"]["c"];
        assert_eq!(collection["config"]["primaryKey"], "key1");
        assert_eq!(
            collection["documents"]["k"]["fields"]["val"],
            serde_json::json!({"type": "string", "value": "v"})
        );
        assert_eq!(collection["indexes"]["val"]["orderedValues"], serde_json::json!(["v"]));
        assert_eq!(collection["indexes"]["val"]["lookup"]["v"], "k");
    }

    #[test]
    fn dump_and_load_round_trip() {
        let store = Store::new();
        let col = store.create_collection("c", config("key1")).unwrap();
        for i in 0..7 {
            let _ = col.put(doc! { "key1": format!("key{}", i), "val": format!("val{}", i), "n": i });
        }
        col.create_index("val").unwrap();
        store.create_collection("empty", config("id")).unwrap();

        let loaded = Store::load(&store.dump().unwrap()).unwrap();
        assert_eq!(loaded.collection_names(), vec!["c", "empty"]);

        let restored = loaded.get_collection("c").unwrap();
        let params = QueryParams::descending().min("val2").max("val4");
        assert_eq!(
            restored.query("val", &params).unwrap(),
            col.query("val", &params).unwrap()
        );
        assert_eq!(
            restored.get("key3").unwrap().get("n"),
            Some(&FieldValue::from(3))
        );
    }

    #[test]
    fn dump_and_load_keep_every_bit_of_numbers() {
        let values = [
            0.1 + 0.2,
            0.012661912332627019,
            1.0 / 3.0,
            -2.718281828459045,
            f64::MIN_POSITIVE,
            5e-324,
            1e-310,
            f64::MAX,
            f64::MIN,
            f64::EPSILON,
            123456789.12345679,
            -0.0,
        ];

        let store = Store::new();
        let col = store.create_collection("numbers", config("id")).unwrap();
        for (i, value) in values.iter().enumerate() {
            let _ = col.put(doc! {
                "id": format!("k{}", i),
                "n": *value,
                "nested": doc! { "list": vec![*value, *value / 7.0] },
            });
        }

        let restored = Store::load(&store.dump().unwrap())
            .unwrap()
            .get_collection("numbers")
            .unwrap();
        for (i, value) in values.iter().enumerate() {
            let key = format!("k{}", i);
            let doc = restored.get(&key).unwrap();
            assert_eq!(doc, col.get(&key).unwrap());
            let n = doc.get("n").and_then(FieldValue::as_number).unwrap();
            assert_eq!(n.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn dump_is_deterministic() {
        let store = Store::new();
        let col = store.create_collection("c", config("id")).unwrap();
        for key in ["z", "a", "m"] {
            let _ = col.put(doc! { "id": key });
        }
        assert_eq!(store.dump().unwrap(), store.dump().unwrap());
    }

    #[test]
    fn dump_fails_on_non_finite_number() {
        let store = Store::new();
        let col = store.create_collection("c", config("id")).unwrap();
        let _ = col.put(doc! { "id": "k", "score": f64::NAN });
        let err = store.dump().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn load_rejects_malformed_bytes() {
        let err = Store::load(b"{\"collections\": [").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);

        let err = Store::load(b"not json at all").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn load_rejects_corrupted_collection() {
        let json = br#"{"collections":{
            "good":{"config":{"primaryKey":"id"},"documents":{}},
            "bad":{"config":{"primaryKey":"id"},"documents":{
                "k1":{"fields":{"id":{"type":"string","value":"other"}}}
            }}
        }}"#;
        let err = Store::load(json).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::SnapshotCorrupted);
    }

    #[test]
    fn save_requires_snapshot_path() {
        let err = Store::new().save().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn dump_to_file_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");

        let store = Store::new();
        let col = store.create_collection("test_collection", config("id")).unwrap();
        let _ = col.put(doc! { "id": "k1", "name": "doc1" });
        store.dump_to_file(&path).unwrap();

        let loaded = Store::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let doc = loaded.get_collection("test_collection").unwrap().get("k1");
        assert_eq!(doc, col.get("k1"));
    }

    #[test]
    fn load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Store::load_from_file(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::FileNotFound);
    }
}
