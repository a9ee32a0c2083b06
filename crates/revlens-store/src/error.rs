use std::path::PathBuf;

/// Errors from revision store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No history exists for the item.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The item exists but has no revision with this id.
    #[error("revision {revision} not found for item {item}")]
    RevisionNotFound { item: String, revision: String },

    /// An item name or revision id cannot be used as a storage key.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A metadata sidecar could not be read or written.
    #[error("bad metadata in {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
