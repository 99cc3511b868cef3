use serde::{Deserialize, Serialize};

use super::{Document, FieldValue, RejectReason};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// Per-collection settings, fixed for the collection's lifetime.
///
/// The primary key names the document field whose string value becomes the
/// document's storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    primary_key: String,
}

impl CollectionConfig {
    /// Creates a config keyed by `primary_key`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the field name is empty.
    pub fn new(primary_key: &str) -> DocStoreResult<Self> {
        let config = CollectionConfig {
            primary_key: primary_key.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub(crate) fn validate(&self) -> DocStoreResult<()> {
        if self.primary_key.is_empty() {
            log::error!("Collection config must name a primary key field");
            return Err(DocStoreError::new(
                "Primary key field name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    /// Extracts the storage key of `document`, or the reason it has none.
    pub fn key_of<'a>(&self, document: &'a Document) -> Result<&'a str, RejectReason> {
        match document.get(&self.primary_key) {
            None => Err(RejectReason::MissingPrimaryKey),
            Some(FieldValue::String(key)) if key.is_empty() => Err(RejectReason::EmptyPrimaryKey),
            Some(FieldValue::String(key)) => Ok(key.as_str()),
            Some(_) => Err(RejectReason::PrimaryKeyNotString),
        }
    }
}
