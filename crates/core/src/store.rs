// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence for application state.
//!
//! Values are arbitrary JSON. Two backends are provided: [`SqliteStore`], a
//! single-table SQLite file that survives restarts, and [`MemoryStore`], a
//! process-local map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::{StorageError, StorageResult};

/// Key holding the persisted `{token, user}` session pair.
pub const SESSION_KEY: &str = "session";
/// Key holding the persisted record collection.
pub const RECORDS_KEY: &str = "tariffs";

/// SQL schema for the key-value table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// String-keyed store of JSON values.
///
/// A key that was never set reads as `Ok(None)`.
pub trait KvStore: Send {
    fn get(&mut self, key: &str) -> StorageResult<Option<Value>>;

    fn set(&mut self, key: &str, value: &Value) -> StorageResult<()>;

    /// Removes a key. Removing a missing key succeeds.
    fn delete(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&mut self, key: &str) -> StorageResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &Value) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}

/// SQLite-backed store.
///
/// The file is opened lazily on first use. If opening fails, every call
/// reports [`StorageError::Unavailable`] and the next call tries again.
pub struct SqliteStore {
    /// `None` for an in-memory database.
    path: Option<PathBuf>,
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Create a store backed by the file at `path`. Nothing is opened yet.
    pub fn open(path: &Path) -> Self {
        SqliteStore {
            path: Some(path.to_path_buf()),
            conn: None,
        }
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            path: None,
            conn: Some(conn),
        })
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns true once the backing database has been opened.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&mut self) -> StorageResult<&Connection> {
        if self.conn.is_none() {
            let path = self
                .path
                .as_deref()
                .ok_or_else(|| StorageError::Unavailable("in-memory store was closed".into()))?;
            self.conn = Some(open_file(path)?);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("store not open".into()))
    }
}

fn open_file(path: &Path) -> StorageResult<Connection> {
    let unavailable = |e: &dyn std::fmt::Display| {
        StorageError::Unavailable(format!("cannot open {}: {e}", path.display()))
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
        }
    }

    let conn = Connection::open(path).map_err(|e| unavailable(&e))?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| unavailable(&e))?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

impl KvStore for SqliteStore {
    fn get(&mut self, key: &str) -> StorageResult<Option<Value>> {
        let conn = self.connection()?;
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &Value) -> StorageResult<()> {
        let text = serde_json::to_string(value)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Process-local store.
///
/// Can be switched into an unavailable state to exercise failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the backend could not be opened.
    pub fn unavailable() -> Self {
        MemoryStore {
            entries: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check(&self) -> StorageResult<()> {
        if self.unavailable {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn get(&mut self, key: &str) -> StorageResult<Option<Value>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> StorageResult<()> {
        self.check()?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
