//! `SQLite` key/value storage for preferences.
//!
//! Preferences are stored locally on the device and never leave it.
//! Queries run on tokio's blocking pool, so the async methods must be called
//! from within a tokio runtime.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::error::{Result, StorageError};
use super::PreferenceStorage;

/// `SQLite`-based [`PreferenceStorage`].
///
/// Thread-safe wrapper around a `SQLite` connection holding a single
/// `preferences` table of string values keyed by name.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Opens (or creates) the storage at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Creates an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = lock(&self.conn)?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )?;

        Ok(())
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| StorageError::Lock(format!("Failed to acquire database lock: {e}")))
}

fn load_blocking(conn: &Mutex<Connection>, key: &str) -> Result<Option<String>> {
    let conn = lock(conn)?;
    let value = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn save_blocking(conn: &Mutex<Connection>, key: &str, value: &str) -> Result<()> {
    let conn = lock(conn)?;
    conn.execute(
        r"
        INSERT INTO preferences (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        ",
        params![key, value, Utc::now().timestamp()],
    )?;
    Ok(())
}

#[async_trait]
impl PreferenceStorage for SqliteStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || load_blocking(&conn, &key)).await?
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let (key, value) = (key.to_owned(), value.to_owned());
        tokio::task::spawn_blocking(move || save_blocking(&conn, &key, &value)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save("prefs", r#"[{"kind":"navigation","value":true}]"#).await.unwrap();

        let loaded = storage.load("prefs").await.unwrap();
        assert_eq!(
            loaded.as_deref(),
            Some(r#"[{"kind":"navigation","value":true}]"#)
        );
    }

    #[tokio::test]
    async fn load_missing_key_returns_none() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert_eq!(storage.load("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_existing_value() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save("prefs", "first").await.unwrap();
        storage.save("prefs", "second").await.unwrap();

        assert_eq!(storage.load("prefs").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save("a", "1").await.unwrap();
        storage.save("b", "2").await.unwrap();

        assert_eq!(storage.load("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(storage.load("b").await.unwrap().as_deref(), Some("2"));
    }

    // The test holds the connection lock across an await on purpose.
    #[allow(clippy::await_holding_lock)]
    #[tokio::test]
    async fn load_waits_off_the_executor() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save("prefs", "value").await.unwrap();

        let held = storage.conn.lock().unwrap();
        let pending = tokio::time::timeout(Duration::from_millis(50), storage.load("prefs")).await;
        assert!(pending.is_err());
        drop(held);

        assert_eq!(storage.load("prefs").await.unwrap().as_deref(), Some("value"));
    }
}
