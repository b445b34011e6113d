//! Error types for preference operations.

use thiserror::Error;

use super::types::OptionKind;
use crate::storage::StorageError;

/// Error type for preference operations.
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// No option of the requested kind is present.
    #[error("Preference not found: {0}")]
    NotFound(OptionKind),

    /// An empty option list was supplied.
    #[error("Preference set is empty")]
    Empty,

    /// The same kind appeared more than once.
    #[error("Duplicate preference kind: {0}")]
    DuplicateKind(OptionKind),

    /// A numeric value is non-finite or outside the kind's range.
    #[error("Value {value} out of range for {kind}")]
    OutOfRange {
        /// The offending kind.
        kind: OptionKind,
        /// The rejected value.
        value: f64,
    },

    /// Persisting the set failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encoding or decoding the persisted form failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for preference operations.
pub type Result<T> = std::result::Result<T, PreferenceError>;
