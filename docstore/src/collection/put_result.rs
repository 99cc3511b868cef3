use std::fmt::{Display, Formatter};

/// Why a document was not stored by [`Collection::put`](super::Collection::put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The document has no field named by the collection's primary key
    MissingPrimaryKey,
    /// The primary-key field exists but is not a string
    PrimaryKeyNotString,
    /// The primary-key field is an empty string
    EmptyPrimaryKey,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingPrimaryKey => write!(f, "primary key field is missing"),
            RejectReason::PrimaryKeyNotString => write!(f, "primary key field is not a string"),
            RejectReason::EmptyPrimaryKey => write!(f, "primary key field is empty"),
        }
    }
}

/// Outcome of a put.
///
/// A rejected put is not an error: the collection is left untouched and the
/// caller may ignore the result for "try-put" semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a put may be rejected without raising an error"]
pub enum PutResult {
    /// A new key was added
    Inserted,
    /// An existing document with the same key was replaced
    Replaced,
    /// Nothing was stored
    Rejected(RejectReason),
}

impl PutResult {
    pub fn is_stored(&self) -> bool {
        !matches!(self, PutResult::Rejected(_))
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            PutResult::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}
