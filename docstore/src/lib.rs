//! # docstore - Embedded In-Memory Document Store
//!
//! docstore keeps schema-less documents in named collections, maintains
//! secondary range indexes over string fields and persists the whole store as
//! a JSON snapshot.
//!
//! ## Key Features
//!
//! - **Schema-less documents**: typed fields, no schema enforced per collection
//! - **Primary keys**: each collection keys documents by one string field
//! - **Range indexes**: inclusive min/max scans in ascending or descending order
//! - **Snapshots**: dump to and load from bytes or files, indexes included
//! - **Thread safe**: handles are cheap clones sharing state behind locks
//!
//! ## Quick Start
//!
//! ```rust
//! use docstore::collection::{CollectionConfig, PutResult, QueryParams};
//! use docstore::doc;
//! use docstore::store::Store;
//!
//! # fn main() -> docstore::errors::DocStoreResult<()> {
//! let store = Store::new();
//! let users = store.create_collection("users", CollectionConfig::new("id")?)?;
//!
//! assert_eq!(users.put(doc! { "id": "u1", "name": "Ann" }), PutResult::Inserted);
//! assert_eq!(users.put(doc! { "id": "u2", "name": "Bob" }), PutResult::Inserted);
//!
//! users.create_index("name")?;
//! let found = users.query("name", &QueryParams::descending())?;
//! assert_eq!(found[0].get_str("id"), Some("u2"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Pattern
//!
//! [`store::Store`] and [`collection::Collection`] are PIMPL handles: a clone
//! is an `Arc` over shared state, so every clone sees the same data.
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, field values, collections and query parameters
//! - [`common`] - Lock helpers and sort order
//! - [`errors`] - Error types and result definitions
//! - [`store`] - Collection registry, configuration and snapshots

pub mod collection;
pub mod common;
pub mod errors;
pub(crate) mod index;
pub mod store;
