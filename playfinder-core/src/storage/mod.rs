//! Key/value persistence for user preferences.
//!
//! The preference store only needs two operations: load a string by key and
//! save a string under a key. Platform layers can provide their own
//! [`PreferenceStorage`]; this module ships an in-memory backend for tests and
//! ephemeral sessions, and a `SQLite` backend for on-device persistence.

mod error;
mod sqlite;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

pub use error::{Result, StorageError};
pub use sqlite::SqliteStorage;

/// Persistence collaborator used by the preference store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single backend can be shared
/// behind an `Arc`.
#[async_trait]
pub trait PreferenceStorage: Send + Sync {
    /// Loads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `Ok(Some(value))` if found, `Ok(None)` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory [`PreferenceStorage`].
///
/// Values live only as long as the instance.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates a new empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut data) = storage.data.write() {
            data.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

#[async_trait]
impl PreferenceStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
