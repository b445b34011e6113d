//! Error types for preference persistence.

use thiserror::Error;

/// Error type for storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the backend was poisoned.
    #[error("Storage lock poisoned: {0}")]
    Lock(String),

    /// The blocking task running a query panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
