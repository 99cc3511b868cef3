use std::path::{Path, PathBuf};

use super::Store;
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// Store-wide settings.
///
/// # Fields
/// - `snapshot_path`: file used by [`Store::save`] and read by [`StoreBuilder::open`]
/// - `pretty_snapshot`: indent the JSON written by `dump`, `dump_to_file` and `save`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    snapshot_path: Option<PathBuf>,
    pretty_snapshot: bool,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn pretty_snapshot(&self) -> bool {
        self.pretty_snapshot
    }

    fn set_snapshot_path(&mut self, path: &Path) -> DocStoreResult<()> {
        if path.as_os_str().is_empty() {
            log::error!("Snapshot path cannot be empty");
            return Err(DocStoreError::new(
                "Snapshot path cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        self.snapshot_path = Some(path.to_path_buf());
        Ok(())
    }
}

/// Builder for a [`Store`].
///
/// The first configuration error is kept and returned from [`open`](Self::open).
///
/// # Examples
///
/// ```rust
/// use docstore::store::Store;
///
/// # fn main() -> docstore::errors::DocStoreResult<()> {
/// let dir = tempfile::tempdir()?;
/// let store = Store::builder()
///     .snapshot_path(dir.path().join("store.json"))
///     .pretty_snapshot(true)
///     .open()?;
/// assert!(store.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StoreBuilder {
    error: Option<DocStoreError>,
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        StoreBuilder {
            error: None,
            config: StoreConfig::new(),
        }
    }

    /// Sets the snapshot file the store is loaded from and saved to.
    pub fn snapshot_path(mut self, path: impl AsRef<Path>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_snapshot_path(path.as_ref()) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn pretty_snapshot(mut self, pretty: bool) -> Self {
        self.config.pretty_snapshot = pretty;
        self
    }

    /// Opens the store.
    ///
    /// When a snapshot path is configured and the file exists, the store is
    /// loaded from it; otherwise the store starts empty.
    ///
    /// # Errors
    ///
    /// Returns a captured configuration error, or any error from reading or
    /// decoding the snapshot file.
    pub fn open(self) -> DocStoreResult<Store> {
        if let Some(error) = self.error {
            return Err(error);
        }

        match self.config.snapshot_path() {
            Some(path) if path.exists() => {
                let bytes = std::fs::read(path)?;
                log::info!("Opening store from snapshot {}", path.display());
                Store::decode(&bytes, self.config.clone())
            }
            _ => Ok(Store::with_config(self.config)),
        }
    }
}
