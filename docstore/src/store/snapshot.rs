use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::collection::{Collection, CollectionConfig, CollectionState, Document};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};
use crate::index::FieldIndex;

/// Serialized form of a whole store.
///
/// ```text
/// {
///   "collections": {
///     "<name>": {
///       "config":    { "primaryKey": "<field>" },
///       "documents": { "<key>": { "fields": { "<field>": { "type": "...", "value": ... } } } },
///       "indexes":   { "<field>": { "orderedValues": ["..."], "lookup": { "<value>": "<key>" } } }
///     }
///   }
/// }
/// ```
///
/// Maps are `BTreeMap`s so the same store always dumps to the same bytes.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoreSnapshot {
    pub collections: BTreeMap<String, CollectionSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSnapshot {
    pub config: CollectionConfig,
    #[serde(default)]
    pub documents: BTreeMap<String, Document>,
    #[serde(default)]
    pub indexes: BTreeMap<String, IndexSnapshot>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexSnapshot {
    pub ordered_values: Vec<String>,
    pub lookup: BTreeMap<String, String>,
}

impl CollectionSnapshot {
    pub fn capture(collection: &Collection) -> Self {
        collection.read_state(|state| CollectionSnapshot {
            config: collection.config().clone(),
            documents: state
                .documents
                .iter()
                .map(|(key, doc)| (key.clone(), doc.clone()))
                .collect(),
            indexes: state
                .indexes
                .iter()
                .map(|(field, index)| (field.clone(), IndexSnapshot::capture(index)))
                .collect(),
        })
    }

    /// Rebuilds a collection, checking it against the invariants a live
    /// collection maintains.
    pub fn restore(self, name: &str) -> DocStoreResult<Collection> {
        self.config.validate().map_err(|e| {
            DocStoreError::new_with_cause(
                &format!("Collection {} has an invalid config", name),
                ErrorKind::SnapshotCorrupted,
                e,
            )
        })?;

        for (key, document) in &self.documents {
            match self.config.key_of(document) {
                Ok(primary) if primary == key => {}
                _ => {
                    return Err(corrupted(&format!(
                        "Document {} in collection {} does not carry its key in field {}",
                        key,
                        name,
                        self.config.primary_key()
                    )))
                }
            }
        }

        let mut indexes = HashMap::with_capacity(self.indexes.len());
        for (field, index) in self.indexes {
            let index = index.restore(&field, &self.documents).map_err(|e| {
                DocStoreError::new_with_cause(
                    &format!("Index {} of collection {} is inconsistent", field, name),
                    ErrorKind::SnapshotCorrupted,
                    e,
                )
            })?;
            indexes.insert(field, index);
        }

        let state = CollectionState {
            documents: self.documents.into_iter().collect(),
            indexes,
        };
        Ok(Collection::from_state(name, self.config, state))
    }
}

impl IndexSnapshot {
    pub fn capture(index: &FieldIndex) -> Self {
        IndexSnapshot {
            ordered_values: index.ordered_values().map(str::to_string).collect(),
            lookup: index
                .lookup_table()
                .map(|(value, key)| (value.to_string(), key.to_string()))
                .collect(),
        }
    }

    /// Rebuilds the index from the restored documents, then points each value
    /// at the key recorded in the lookup table. The snapshot must describe
    /// exactly the values those documents hold.
    pub fn restore(
        self,
        field: &str,
        documents: &BTreeMap<String, Document>,
    ) -> DocStoreResult<FieldIndex> {
        let mut index = FieldIndex::build(field, documents);
        if !index.ordered_values().eq(self.ordered_values.iter().map(String::as_str)) {
            return Err(corrupted("Ordered values do not match the indexed documents"));
        }
        if self.lookup.len() != index.len() {
            return Err(corrupted("Lookup table does not cover every ordered value"));
        }
        for (value, key) in &self.lookup {
            if !index.promote(value, key) {
                return Err(corrupted(&format!(
                    "Lookup maps {} to {}, which does not hold it",
                    value, key
                )));
            }
        }
        Ok(index)
    }
}

fn corrupted(message: &str) -> DocStoreError {
    log::error!("{}", message);
    DocStoreError::new(message, ErrorKind::SnapshotCorrupted)
}
