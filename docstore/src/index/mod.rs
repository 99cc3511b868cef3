//! Secondary indexes over string-valued document fields.
//!
//! An index keeps the distinct values of one field in an ordered tree and maps
//! each value to the primary key of the document that last wrote it. Indexes
//! are created and dropped per collection, and every put or delete on the
//! collection keeps them current.
//!
//! ```rust
//! use docstore::collection::{CollectionConfig, QueryParams};
//! use docstore::doc;
//! use docstore::store::Store;
//!
//! # fn main() -> docstore::errors::DocStoreResult<()> {
//! let store = Store::new();
//! let books = store.create_collection("books", CollectionConfig::new("isbn")?)?;
//! let _ = books.put(doc! { "isbn": "1", "title": "Dune" });
//! let _ = books.put(doc! { "isbn": "2", "title": "Emma" });
//!
//! books.create_index("title")?;
//! let from_e = books.query("title", &QueryParams::ascending().min("E"))?;
//! assert_eq!(from_e.len(), 1);
//! # Ok(())
//! # }
//! ```

mod field_index;

pub(crate) use field_index::*;
