//! The collection registry and its snapshot codec.
//!
//! A [`Store`] maps collection names to [`Collection`](crate::collection::Collection)
//! handles. Its whole content, indexes included, can be dumped to JSON bytes
//! or a file and loaded back into an independent store.
//!
//! # Opening
//!
//! [`Store::new`] gives an empty store with default settings. [`StoreBuilder`]
//! configures a snapshot file: [`StoreBuilder::open`] loads it when it exists
//! and [`Store::save`] writes it back.
//!
//! # Snapshot format
//!
//! Snapshots are JSON objects keyed by collection name. Every map in the
//! snapshot is ordered, so dumping an unchanged store twice gives the same
//! bytes. Loading checks that each document carries its own key and that
//! every index is self-consistent, and fails with `SnapshotCorrupted`
//! otherwise.

mod snapshot;
mod store;
mod store_config;

pub use store::Store;
pub use store_config::*;
