use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for docstore operations.
///
/// Every fallible operation reports exactly one kind, so callers can branch on
/// [`DocStoreError::kind`] instead of matching on message text.
///
/// # Examples
///
/// ```rust
/// use docstore::errors::{DocStoreError, DocStoreResult, ErrorKind};
///
/// fn example() -> DocStoreResult<()> {
///     Err(DocStoreError::new("Index not found", ErrorKind::IndexNotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::IndexNotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Indexing Errors
    /// No index covers the requested field
    IndexNotFound,
    /// An index on the field already exists
    IndexAlreadyExists,

    // Registry Errors
    /// A collection with the same name already exists
    CollectionAlreadyExists,

    // Validation Errors
    /// Generic validation error
    ValidationError,
    /// The operation is not valid in the current context
    InvalidOperation,

    // Snapshot Errors
    /// Error encoding or decoding data
    EncodingError,
    /// The snapshot decoded but violates a store invariant
    SnapshotCorrupted,

    // IO Errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::IndexNotFound => write!(f, "Index not found"),
            ErrorKind::IndexAlreadyExists => write!(f, "Index already exists"),
            ErrorKind::CollectionAlreadyExists => write!(f, "Collection already exists"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::SnapshotCorrupted => write!(f, "Snapshot corrupted"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docstore error type.
///
/// `DocStoreError` carries a message, an [`ErrorKind`] and an optional cause.
/// A backtrace is captured at construction and printed by the `Debug` impl
/// when the error has no cause.
///
/// # Examples
///
/// ```rust
/// use docstore::errors::{DocStoreError, ErrorKind};
///
/// let cause = DocStoreError::new("unexpected end of input", ErrorKind::EncodingError);
/// let err = DocStoreError::new_with_cause("Failed to load snapshot", ErrorKind::EncodingError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct DocStoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocStoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl DocStoreError {
    /// Creates a new `DocStoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocStoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `DocStoreError` chained onto an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocStoreError) -> Self {
        DocStoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DocStoreError> {
        self.cause.as_deref()
    }
}

impl Display for DocStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for DocStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docstore operations.
pub type DocStoreResult<T> = Result<T, DocStoreError>;

impl From<std::io::Error> for DocStoreError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        DocStoreError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for DocStoreError {
    fn from(err: serde_json::Error) -> Self {
        let error_kind = if err.is_io() {
            ErrorKind::IOError
        } else {
            ErrorKind::EncodingError
        };
        DocStoreError::new(&format!("Snapshot encoding error: {}", err), error_kind)
    }
}
