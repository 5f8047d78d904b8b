//! Error types for the storage layer.

use stronghold_types::TypeError;

/// Errors that can occur while talking to the storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing database could not be opened or its schema could not
    /// be created. Fatal at startup: initialization aborts.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The database was closed. Every call attempted after
    /// [`Database::close`](crate::Database::close) fails with this.
    #[error("storage is closed")]
    Closed,

    /// A single statement failed.
    #[error("operation failed: {0}")]
    OperationFailed(#[from] sqlx::Error),

    /// A stored value could not be decoded (e.g. a malformed identity).
    #[error("corrupt row: {0}")]
    CorruptRow(#[from] TypeError),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
