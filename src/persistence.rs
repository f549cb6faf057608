//! World-state backends for the SFD ledger

use crate::error::LedgerError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key-value collaborator the ledger reads and writes through. A single
/// ledger invocation assumes nobody else mutates the keys it touches.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::StoreError(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS world_state (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            LedgerError::StoreError(format!("Failed to create world_state table: {}", e))
        })?;

        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LedgerError::StoreError("Mutex poisoned".to_string()))?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))
            .map_err(|e| LedgerError::StoreError(format!("Failed to count keys: {}", e)))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for SqliteStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LedgerError::StoreError("Mutex poisoned".to_string()))?;
        conn.query_row(
            "SELECT value FROM world_state WHERE key = ?1",
            params![key],
            |row| row.get::<_, Vec<u8>>(0),
        )
        .optional()
        .map_err(|e| LedgerError::StoreError(format!("Failed to read key {}: {}", key, e)))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LedgerError::StoreError("Mutex poisoned".to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO world_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| LedgerError::StoreError(format!("Failed to write key {}: {}", key, e)))?;
        Ok(())
    }
}

/// Simple in-memory world state useful for tests and ephemeral runs.
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::StoreError("Mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::StoreError("Mutex poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
