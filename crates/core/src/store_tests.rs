// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn nested_records() -> Value {
    json!([
        { "id": 1, "val": "T1", "qrs": ["a", "b"], "processed": true, "meta": { "x": [1, 2] } },
        { "val": "T3", "qrs": [], "processed": false }
    ])
}

fn exercise(store: &mut dyn KvStore) {
    assert_eq!(store.get("missing").unwrap(), None);

    store.set(RECORDS_KEY, &nested_records()).unwrap();
    assert_eq!(store.get(RECORDS_KEY).unwrap(), Some(nested_records()));

    store.set(RECORDS_KEY, &json!([])).unwrap();
    assert_eq!(store.get(RECORDS_KEY).unwrap(), Some(json!([])));

    store.delete(RECORDS_KEY).unwrap();
    assert_eq!(store.get(RECORDS_KEY).unwrap(), None);

    // Deleting again is fine
    store.delete(RECORDS_KEY).unwrap();
}

#[test]
fn memory_store_contract() {
    exercise(&mut MemoryStore::new());
}

#[test]
fn sqlite_in_memory_contract() {
    exercise(&mut SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_file_contract() {
    let dir = TempDir::new().unwrap();
    exercise(&mut SqliteStore::open(&dir.path().join("store.db")));
}

#[test]
fn sqlite_opens_lazily_and_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("store.db");
    let mut store = SqliteStore::open(&path);
    assert!(!store.is_open());
    assert!(!path.exists());

    store.set(SESSION_KEY, &json!({ "token": "t", "user": "u" })).unwrap();
    assert!(store.is_open());
    assert!(path.exists());
}

#[test]
fn sqlite_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    {
        let mut store = SqliteStore::open(&path);
        store.set(RECORDS_KEY, &nested_records()).unwrap();
    }

    let mut reopened = SqliteStore::open(&path);
    assert_eq!(reopened.get(RECORDS_KEY).unwrap(), Some(nested_records()));
}

#[test]
fn sqlite_unopenable_path_is_unavailable_and_retryable() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut store = SqliteStore::open(&blocker.join("store.db"));

    let err = store.set(RECORDS_KEY, &json!([])).unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(err.is_retryable());

    assert!(store.get(RECORDS_KEY).is_err());
    assert!(!store.is_open());
}

#[test]
fn sqlite_recovers_once_path_becomes_usable() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("later");
    std::fs::write(&blocker, b"temporarily a file").unwrap();
    let mut store = SqliteStore::open(&blocker.join("store.db"));

    assert!(store.set(RECORDS_KEY, &json!([])).is_err());

    std::fs::remove_file(&blocker).unwrap();
    store.set(RECORDS_KEY, &json!([1])).unwrap();
    assert_eq!(store.get(RECORDS_KEY).unwrap(), Some(json!([1])));
}

#[test]
fn sqlite_corrupted_value_is_serialization_error() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .unwrap()
        .execute(
            "INSERT INTO kv (key, value, updated_at) VALUES ('tariffs', '{broken', '')",
            [],
        )
        .unwrap();

    let err = store.get(RECORDS_KEY).unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[test]
fn memory_store_unavailable_fails_every_call() {
    let mut store = MemoryStore::unavailable();
    assert!(store.get("k").is_err());
    assert!(store.set("k", &json!(1)).is_err());
    assert!(store.delete("k").is_err());

    store.set_unavailable(false);
    store.set("k", &json!(1)).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn boxed_store_delegates() {
    let mut store: Box<dyn KvStore> = Box::new(MemoryStore::new());
    store.set("k", &json!("v")).unwrap();
    assert_eq!(store.get("k").unwrap(), Some(json!("v")));
}
