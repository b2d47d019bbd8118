// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn canned_login_succeeds() {
    let grant = Authority::canned()
        .authenticate("testuser", "password123")
        .unwrap();
    assert_eq!(grant.token, "fake-token-123456");
    assert_eq!(grant.user, "testuser");
}

#[parameterized(
    wrong_password = { "testuser", "wrongpassword", AuthError::InvalidCredentials },
    unknown_user = { "nonexistent", "password123", AuthError::UserNotFound },
    empty = { "", "", AuthError::UserNotFound },
    special_chars = { "!@#$%^&*()[]{}|;:,.<>?", "!@#$%^&*()[]{}|;:,.<>?", AuthError::UserNotFound },
)]
fn canned_login_failures(user: &str, password: &str, expected: AuthError) {
    let err = Authority::canned().authenticate(user, password).unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn long_login_is_user_not_found() {
    let long = "a".repeat(10_000);
    let err = Authority::canned().authenticate(&long, &long).unwrap_err();
    assert_eq!(err, AuthError::UserNotFound);
}

#[test]
fn canned_tokens_are_the_default_allow_list() {
    let authority = Authority::canned();
    for account in authority.accounts() {
        assert!(DEFAULT_ALLOWED_TOKENS.contains(&account.token.as_str()));
    }
}

#[test]
fn records_are_all_processed() {
    let records = Authority::canned().records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.processed));
}

#[test]
fn records_have_unique_ids_and_valid_timestamps() {
    let records = Authority::canned().records();
    let ids: std::collections::HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids.len(), records.len());
    for record in &records {
        let created = record.created_at.as_deref().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }
}

#[test]
fn load_seed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.json");
    std::fs::write(
        &path,
        r#"{
            "users": [{ "login": "u", "password": "p", "token": "tok" }],
            "tariffs": [{ "id": "9", "val": "T2", "qrs": ["QR1"], "created": "2023-01-01T00:00:00Z" }]
        }"#,
    )
    .unwrap();

    let authority = Authority::load(&path).unwrap();
    assert_eq!(authority.authenticate("u", "p").unwrap().token, "tok");
    let records = authority.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].processed);
}

#[test]
fn load_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(Authority::load(&dir.path().join("missing.json")).is_err());
}

#[test]
fn push_record_is_served_processed() {
    let mut authority = Authority::new(Vec::new(), Vec::new());
    authority.push_record(Record::new(TariffValue::tag("T2"), vec!["z".into()]));
    assert!(authority.records()[0].processed);
}

#[test]
fn push_record_replaces_same_entity() {
    let mut authority = Authority::new(Vec::new(), Vec::new());
    authority.push_record(Record::new(TariffValue::tag("T2"), vec!["z".into()]).with_id("old"));
    authority.push_record(Record::new(TariffValue::tag("T1"), vec!["z".into()]));
    authority.push_record(Record::new(TariffValue::tag("T2"), vec!["z".into()]).with_id("new"));

    let records = authority.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some("new".into()));
}
