//! Collections and documents for schema-less data storage.
//!
//! # Documents
//!
//! A [`Document`] maps field names to typed [`FieldValue`]s. No schema is
//! enforced: any document may go into any collection.
//!
//! ```rust
//! use docstore::doc;
//!
//! let doc = doc! { "id": "u-1", "name": "Alice", "age": 30 };
//! assert_eq!(doc.get_str("name"), Some("Alice"));
//! ```
//!
//! # Collections
//!
//! A [`Collection`] stores documents under the string value of its
//! configured primary-key field and supports:
//! - put, get, delete and list by primary key
//! - secondary indexes over string-valued fields
//! - inclusive range scans over an index in either direction
//!
//! # Primary keys
//!
//! A put whose document lacks a non-empty string primary key is rejected
//! without error and reported through [`PutResult::Rejected`].

mod config;
mod document;
mod document_collection;
mod field;
mod put_result;
mod query;

pub use config::*;
pub use document::*;
pub use document_collection::Collection;
pub(crate) use document_collection::CollectionState;
pub use field::*;
pub use put_result::*;
pub use query::*;
