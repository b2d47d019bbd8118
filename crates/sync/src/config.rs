// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Stored as TOML, typically in `tariff-sync/config.toml` under the user's
//! config directory:
//! - `store_path`: SQLite file backing the local store
//! - `merge_policy`: `remote-wins-on-match` (default) or `remote-replaces-all`
//! - `allowed_tokens`: session tokens accepted on restore
//! - `[remote]`: which authority to talk to and the simulated latencies

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tariff_core::{MergePolicy, DEFAULT_ALLOWED_TOKENS};

use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "tariff-sync";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "store.db";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file backing the local store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// How a sync combines the authority's records with local ones.
    #[serde(default)]
    pub merge_policy: MergePolicy,
    /// Tokens accepted when restoring a persisted session.
    #[serde(default = "default_allowed_tokens")]
    pub allowed_tokens: Vec<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote authority configuration.
///
/// With no `url` the client uses the in-process simulated authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of a `tariff-remote` server (`ws://...` or `wss://...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Simulated login latency in milliseconds (default: 1200).
    #[serde(default = "default_auth_latency_ms")]
    pub auth_latency_ms: u64,
    /// Simulated fetch latency in milliseconds (default: 500).
    #[serde(default = "default_fetch_latency_ms")]
    pub fetch_latency_ms: u64,
}

fn default_auth_latency_ms() -> u64 {
    1200
}

fn default_fetch_latency_ms() -> u64 {
    500
}

fn default_allowed_tokens() -> Vec<String> {
    DEFAULT_ALLOWED_TOKENS.iter().map(|t| t.to_string()).collect()
}

fn default_store_path() -> PathBuf {
    app_dir(dirs::data_dir()).join(STORE_FILE_NAME)
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    match base {
        Some(dir) => dir.join(APP_DIR_NAME),
        None => PathBuf::from(format!(".{APP_DIR_NAME}")),
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: None,
            auth_latency_ms: default_auth_latency_ms(),
            fetch_latency_ms: default_fetch_latency_ms(),
        }
    }
}

impl RemoteConfig {
    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }

    /// Returns an error message if the URL is set but not a WebSocket URL.
    pub fn validate_url(&self) -> Option<String> {
        match self.url.as_deref() {
            None => None,
            Some(url) if url.starts_with("ws://") || url.starts_with("wss://") => None,
            Some(url) => Some(format!(
                "invalid remote URL '{url}': must be ws:// or wss://"
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: default_store_path(),
            merge_policy: MergePolicy::default(),
            allowed_tokens: default_allowed_tokens(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        app_dir(dirs::config_dir()).join(CONFIG_FILE_NAME)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        if let Some(msg) = config.remote.validate_url() {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Loads configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Saves configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
