use docstore::collection::{Collection, CollectionConfig, Document};
use docstore::doc;
use docstore::errors::{DocStoreError, DocStoreResult, ErrorKind};
use docstore::store::Store;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Runs `test` between `before` and `after`, reporting the stage that failed.
/// `after` also runs when the test body returns an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> DocStoreResult<()>,
    B: Fn() -> DocStoreResult<TestContext>,
    A: Fn(TestContext) -> DocStoreResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = test(ctx.clone());
    let cleanup = after(ctx);

    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = cleanup {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    dir: Arc<TempDir>,
    store: Store,
}

impl TestContext {
    pub fn new(dir: TempDir, store: Store) -> Self {
        Self {
            dir: Arc::new(dir),
            store,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// File the store saves to.
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    pub fn store(&self) -> Store {
        self.store.clone()
    }
}

/// An empty store with a snapshot file inside a fresh temp directory.
pub fn create_test_context() -> DocStoreResult<TestContext> {
    let dir = tempfile::tempdir()?;
    let store = Store::builder()
        .snapshot_path(dir.path().join("store.json"))
        .open()?;
    Ok(TestContext::new(dir, store))
}

pub fn cleanup(ctx: TestContext) -> DocStoreResult<()> {
    for name in ctx.store().collection_names() {
        ctx.store().delete_collection(&name);
    }
    if !ctx.store().is_empty() {
        return Err(DocStoreError::new(
            "Store still has collections after cleanup",
            ErrorKind::InternalError,
        ));
    }
    Ok(())
}

pub fn config(primary_key: &str) -> CollectionConfig {
    match CollectionConfig::new(primary_key) {
        Ok(config) => config,
        Err(e) => panic!("invalid primary key {:?}: {}", primary_key, e),
    }
}

/// Documents `{"key1": "key<i>", "val": "val<i>", "n": i}` for `i` in `0..count`.
pub fn val_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "key1": format!("key{}", i),
                "val": format!("val{}", i),
                "n": i as i64,
            }
        })
        .collect()
}

/// Creates `name` keyed by `key1`, puts [`val_documents`] in random order and
/// indexes `val`.
pub fn populate_val_collection(store: &Store, name: &str, count: usize) -> DocStoreResult<Collection> {
    let collection = store.create_collection(name, config("key1"))?;

    let mut documents = val_documents(count);
    documents.shuffle(&mut rand::rng());
    for document in documents {
        if !collection.put(document).is_stored() {
            return Err(DocStoreError::new(
                "Failed to put generated document",
                ErrorKind::InternalError,
            ));
        }
    }

    collection.create_index("val")?;
    Ok(collection)
}

/// Primary keys of `documents`, in order.
pub fn keys_of(documents: &[Document], primary_key: &str) -> Vec<String> {
    documents
        .iter()
        .filter_map(|doc| doc.get_str(primary_key).map(str::to_string))
        .collect()
}
