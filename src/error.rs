//! Error types for foldercaps

use crate::model::FolderId;

/// The main error type for foldercaps operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A referenced folder could not be fetched (missing, denied, deleted)
    #[error("folder {0} is unknown")]
    FolderUnknown(FolderId),
    /// An object names no folder and no ACL entry applies to the user
    #[error("object {0} has no folder and no matching permission")]
    Unplaced(String),
    /// The API was used out of order, e.g. `has()` before resolution
    #[error("usage error: {0}")]
    Usage(String),
    /// A selection entry could not be classified as folder or object
    #[error("invalid item: {0}")]
    InvalidItem(String),
    /// The folder store rejected a whole batch request
    #[error("batch lookup failed: {0}")]
    Batch(String),
    /// Storage or serialization failure
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias for foldercaps operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert any storage error to `Error::Store`
pub fn err<E: std::error::Error>(e: E) -> Error {
    Error::Store(e.to_string())
}
