//! String key/value storage with a `SQLite` backend and an in-memory one.

use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Failure of a storage backend, attached as context to the underlying error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum StorageError {
    /// Reading `key` failed.
    #[error("failed to read storage key {key:?}")]
    Read {
        /// Storage key.
        key: String,
    },
    /// Writing `key` failed.
    #[error("failed to write storage key {key:?}")]
    Write {
        /// Storage key.
        key: String,
    },
}

/// A minimal string key/value store.
pub trait KeyValueStorage {
    /// Returns the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] (as context) if the backend fails.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] (as context) if the backend fails.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backed by the `local_storage` table.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps an opened and migrated connection (see [`crate::open_db`]).
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| StorageError::Read {
                key: String::from(key),
            })
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .with_context(|| StorageError::Write {
                key: String::from(key),
            })?;
        Ok(())
    }
}

/// Process-local storage, mainly for tests.
#[derive(Debug, Default, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(String::from(key), String::from(value));
        Ok(())
    }
}
