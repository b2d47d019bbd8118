// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the authority dataset for shared access across connections.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tariff_core::{AuthError, AuthGrant, Authority, Record, StorageResult};

/// Artificial delays applied before answering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency {
    pub auth: Duration,
    pub fetch: Duration,
}

/// Shared server state containing the authority dataset.
///
/// The dataset is immutable once loaded.
#[derive(Clone)]
pub struct AuthorityState {
    inner: Arc<AuthorityStateInner>,
}

struct AuthorityStateInner {
    authority: Authority,
    latency: Latency,
}

impl AuthorityState {
    pub fn new(authority: Authority, latency: Latency) -> Self {
        AuthorityState {
            inner: Arc::new(AuthorityStateInner {
                authority,
                latency,
            }),
        }
    }

    /// Loads the dataset from a seed file, or uses the canned one.
    pub fn load(seed: Option<&Path>, latency: Latency) -> StorageResult<Self> {
        let authority = match seed {
            Some(path) => Authority::load(path)?,
            None => Authority::canned(),
        };
        Ok(Self::new(authority, latency))
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError> {
        delay(self.inner.latency.auth).await;
        self.inner.authority.authenticate(username, password)
    }

    /// The authoritative records, all marked processed.
    pub async fn records(&self) -> Vec<Record> {
        delay(self.inner.latency.fetch).await;
        self.inner.authority.records()
    }

    /// Number of user accounts served.
    pub fn account_count(&self) -> usize {
        self.inner.authority.accounts().len()
    }
}

async fn delay(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
