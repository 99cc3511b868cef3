use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::FieldValue;

/// A schema-less bag of named, typed fields.
///
/// Any document may be stored in any collection; the only requirement a
/// collection places on it is that its primary-key field holds a non-empty
/// string.
///
/// ## Cheap copies
///
/// Fields live in an `im::OrdMap`, a persistent map whose clone is O(1) and
/// shares structure with the original. Collections hand out copies from
/// `get`, `list` and `query`, so a caller never aliases the stored value.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::{Document, FieldValue};
/// use docstore::doc;
///
/// let mut user = Document::new();
/// user.put("id", "u-1");
/// user.put("age", 30);
/// assert_eq!(user.get_str("id"), Some("u-1"));
///
/// let same = doc! { "id": "u-1", "age": 30 };
/// assert_eq!(user, same);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    fields: OrdMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            fields: OrdMap::new(),
        }
    }

    /// Sets a field, returning the value it replaced.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the field's value only when it is string-typed.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates the fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut document = Document::new();
        for (name, value) in iter {
            document.put(name, value);
        }
        document
    }
}

/// Builds a [`Document`] from `"name": value` pairs.
///
/// Values go through `Into<FieldValue>`, so strings, numbers, bools, vectors
/// and nested documents can be written directly.
///
/// ```rust
/// use docstore::doc;
///
/// let order = doc! {
///     "id": "o-17",
///     "total": 12.5,
///     "paid": false,
///     "tags": vec!["gift", "express"],
///     "customer": doc! { "name": "Olena" },
/// };
/// assert_eq!(order.len(), 5);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($name:literal : $value:expr),+ $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($name, $value);
            )+
            doc
        }
    };
}
