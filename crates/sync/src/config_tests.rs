// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.merge_policy, MergePolicy::RemoteWinsOnMatch);
    assert_eq!(config.allowed_tokens, vec!["fake-token-123456", "token-987654321"]);
    assert_eq!(config.remote.url, None);
    assert_eq!(config.remote.auth_latency(), Duration::from_millis(1200));
    assert_eq!(config.remote.fetch_latency(), Duration::from_millis(500));
    assert!(config.store_path.ends_with("store.db"));
}

#[test]
fn save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        store_path: dir.path().join("store.db"),
        merge_policy: MergePolicy::RemoteReplacesAll,
        allowed_tokens: vec!["only".to_string()],
        remote: RemoteConfig {
            url: Some("ws://localhost:7890".to_string()),
            auth_latency_ms: 0,
            fetch_latency_ms: 10,
        },
    };
    config.save(&path).unwrap();

    assert_eq!(Config::load(&path).unwrap(), config);
}

#[test]
fn empty_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.allowed_tokens.len(), 2);
    assert_eq!(config.remote.auth_latency_ms, 1200);
}

#[test]
fn partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
merge_policy = "remote-replaces-all"

[remote]
fetch_latency_ms = 2000
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.merge_policy, MergePolicy::RemoteReplacesAll);
    assert_eq!(config.remote.fetch_latency_ms, 2000);
    assert_eq!(config.remote.auth_latency_ms, 1200);
}

#[parameterized(
    bad_policy = { "merge_policy = \"local-wins\"" },
    bad_url = { "[remote]\nurl = \"http://example.com\"" },
    not_toml = { "this is = = not toml" },
)]
fn invalid_config_is_rejected(content: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn missing_file_is_error_unless_defaulted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(Config::load(&path).is_err());
    assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
}

#[parameterized(
    none = { None, true },
    ws = { Some("ws://localhost:7890"), true },
    wss = { Some("wss://tariffs.example.com"), true },
    http = { Some("http://localhost"), false },
)]
fn remote_url_validation(url: Option<&str>, valid: bool) {
    let remote = RemoteConfig {
        url: url.map(String::from),
        ..RemoteConfig::default()
    };
    assert_eq!(remote.validate_url().is_none(), valid);
}
