// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end behaviour through the public client API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use tariff_core::{
    AuthError, KvStore, MemoryStore, Record, TariffValue, RECORDS_KEY, SESSION_KEY,
};
use tariff_sync::{Client, Config, Error, OfflineSwitch, SimulatedRemote, SyncContext};

fn tariff(value: &str, codes: &[&str]) -> Record {
    Record::new(
        TariffValue::tag(value),
        codes.iter().map(|c| c.to_string()).collect(),
    )
}

fn client_over(
    store: MemoryStore,
    remote: SimulatedRemote,
) -> (Client<MemoryStore, SimulatedRemote>, OfflineSwitch) {
    let switch = remote.offline_switch();
    let client = Client::new(SyncContext::new(store, remote, Config::default()));
    (client, switch)
}

fn authority_serving(records: Vec<Record>) -> SimulatedRemote {
    SimulatedRemote::new(tariff_core::Authority::new(Vec::new(), records)).instant()
}

#[tokio::test]
async fn remote_records_with_empty_local() {
    let (mut client, _) = client_over(
        MemoryStore::new(),
        authority_serving(vec![tariff("T1", &["a"])]),
    );

    let outcome = client.sync().await.unwrap();

    assert_eq!(
        outcome.records(),
        &[tariff("T1", &["a"]).with_processed(true)]
    );
}

#[tokio::test]
async fn local_records_with_empty_remote() {
    let mut store = MemoryStore::new();
    store
        .set(RECORDS_KEY, &json!([{ "val": "T1", "qrs": ["a"], "processed": false }]))
        .unwrap();
    let (mut client, _) = client_over(store, authority_serving(Vec::new()));
    client.start();

    let outcome = client.sync().await.unwrap();

    assert_eq!(outcome.records(), &[tariff("T1", &["a"])]);
}

#[tokio::test]
async fn remote_copy_wins_matching_identity() {
    let mut store = MemoryStore::new();
    store
        .set(RECORDS_KEY, &json!([{ "val": "T1", "qrs": ["a"], "processed": false }]))
        .unwrap();
    let (mut client, _) = client_over(store, authority_serving(vec![tariff("T1", &["a"])]));
    client.start();

    let outcome = client.sync().await.unwrap();

    assert_eq!(
        outcome.records(),
        &[tariff("T1", &["a"]).with_processed(true)]
    );
    assert!(client.pending().is_empty());
}

#[tokio::test(start_paused = true)]
async fn login_persists_token_and_rejection_persists_nothing() {
    let (mut client, _) = client_over(MemoryStore::new(), SimulatedRemote::default());
    let start = tokio::time::Instant::now();

    let session = client.login("testuser", "password123").await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1200));
    assert_eq!(session.token, "fake-token-123456");
    assert_eq!(
        client.context_mut().store.get(SESSION_KEY),
        Some(json!({ "token": "fake-token-123456", "user": "testuser" }))
    );

    let (mut rejected, _) = client_over(MemoryStore::new(), SimulatedRemote::default());
    let err = rejected.login("testuser", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
    assert!(rejected.context().store.inner().is_empty());
}

#[tokio::test]
async fn restore_with_unknown_token_purges_it() {
    let mut store = MemoryStore::new();
    store
        .set(SESSION_KEY, &json!({ "token": "expired", "user": "testuser" }))
        .unwrap();
    let (mut client, _) = client_over(store, SimulatedRemote::default().instant());

    assert!(!client.restore_session());
    assert_eq!(client.context_mut().store.get(SESSION_KEY), None);
}

#[tokio::test]
async fn degraded_sync_equals_last_persisted_value() {
    let persisted = json!([
        { "id": 10, "val": "T2", "qrs": ["p", "q"], "processed": true, "created": "2025-01-01T00:00:00Z" },
        { "val": 3, "qrs": [], "processed": false, "note": "numeric tag" }
    ]);
    let mut store = MemoryStore::new();
    store.set(RECORDS_KEY, &persisted).unwrap();
    let (mut client, switch) = client_over(store, SimulatedRemote::default().instant());
    switch.go_offline();

    let outcome = client.sync().await.unwrap();

    assert!(outcome.is_degraded());
    assert_eq!(serde_json::to_value(outcome.records()).unwrap(), persisted);
    assert_eq!(client.context_mut().store.get(RECORDS_KEY), Some(persisted));
}

#[tokio::test]
async fn back_online_sync_merges_offline_work() {
    let (mut client, switch) = client_over(MemoryStore::new(), SimulatedRemote::default().instant());
    switch.go_offline();

    client.add_record(tariff("T2", &["offline-1"])).unwrap();
    client.add_record(tariff("T3", &["offline-2"])).unwrap();
    assert!(client.sync().await.unwrap().is_degraded());

    switch.go_online();
    let outcome = client.sync().await.unwrap();

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.records().len(), 4);
    assert_eq!(client.pending().len(), 2);
}
