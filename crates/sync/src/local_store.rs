// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local store adapter.
//!
//! Reads degrade to "absent" when the backend fails and log a warning, so a
//! broken disk never stops the app from starting. Writes return the error so
//! nothing is silently lost.

use serde_json::Value;
use tracing::warn;

use tariff_core::record::{from_plain, to_plain};
use tariff_core::{KvStore, Record, StorageResult, RECORDS_KEY, SESSION_KEY};

use crate::session::Session;

/// Wraps a [`KvStore`] with the read/write error policy and typed helpers
/// for the two well-known keys.
pub struct LocalStore<S: KvStore> {
    inner: S,
}

impl<S: KvStore> LocalStore<S> {
    pub fn new(inner: S) -> Self {
        LocalStore { inner }
    }

    /// Reads a key. Missing keys and backend failures both read as `None`.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "local store read failed, treating as absent");
                None
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &Value) -> StorageResult<()> {
        self.inner.set(key, value)
    }

    pub fn delete(&mut self, key: &str) -> StorageResult<()> {
        self.inner.delete(key)
    }

    /// Reads the persisted session, if one is stored and well formed.
    pub fn load_session(&mut self) -> Option<Value> {
        self.get(SESSION_KEY)
    }

    pub fn save_session(&mut self, session: &Session) -> StorageResult<()> {
        let value = serde_json::to_value(session)?;
        self.set(SESSION_KEY, &value)
    }

    pub fn clear_session(&mut self) -> StorageResult<()> {
        self.delete(SESSION_KEY)
    }

    /// Reads the persisted record collection. Never fails: nothing stored,
    /// an unreadable backend, or a value that is not an array all yield an
    /// empty collection. Entries that are not records are skipped.
    pub fn load_records(&mut self) -> Vec<Record> {
        let Some(value) = self.get(RECORDS_KEY) else {
            return Vec::new();
        };
        let decoded = from_plain(value);
        for (entry, reason) in &decoded.rejected {
            warn!(%entry, %reason, "skipping unreadable persisted record");
        }
        decoded.records
    }

    /// Replaces the persisted collection with `records`.
    pub fn save_records(&mut self, records: &[Record]) -> StorageResult<()> {
        let value = to_plain(records)?;
        self.set(RECORDS_KEY, &value)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[cfg(test)]
#[path = "local_store_tests.rs"]
mod tests;
