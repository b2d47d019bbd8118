// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-process authority answering from a canned dataset after a fixed delay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tariff_core::{AuthGrant, Authority, Record, RemoteError};
use tracing::debug;

use super::{Remote, RemoteFuture};
use crate::config::RemoteConfig;

/// Shared handle that takes a [`SimulatedRemote`] offline and back.
///
/// Cloning yields another handle to the same switch, so a test can keep one
/// after handing the remote to a client.
#[derive(Debug, Clone, Default)]
pub struct OfflineSwitch(Arc<AtomicBool>);

impl OfflineSwitch {
    pub fn go_offline(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Simulated remote authority.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    authority: Authority,
    auth_latency: Duration,
    fetch_latency: Duration,
    offline: OfflineSwitch,
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self::new(Authority::canned())
    }
}

impl SimulatedRemote {
    /// Default login latency.
    pub const AUTH_LATENCY: Duration = Duration::from_millis(1200);
    /// Default fetch latency.
    pub const FETCH_LATENCY: Duration = Duration::from_millis(500);

    pub fn new(authority: Authority) -> Self {
        SimulatedRemote {
            authority,
            auth_latency: Self::AUTH_LATENCY,
            fetch_latency: Self::FETCH_LATENCY,
            offline: OfflineSwitch::default(),
        }
    }

    /// Builds a remote over the canned dataset with the configured latencies.
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::default().with_latency(config.auth_latency(), config.fetch_latency())
    }

    pub fn with_latency(mut self, auth: Duration, fetch: Duration) -> Self {
        self.auth_latency = auth;
        self.fetch_latency = fetch;
        self
    }

    /// Removes every delay.
    pub fn instant(self) -> Self {
        self.with_latency(Duration::ZERO, Duration::ZERO)
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut Authority {
        &mut self.authority
    }

    /// Returns a handle to this remote's offline switch.
    pub fn offline_switch(&self) -> OfflineSwitch {
        self.offline.clone()
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline.is_offline() {
            return Err(RemoteError::Unavailable(
                "simulated authority is offline".into(),
            ));
        }
        Ok(())
    }
}

async fn delay(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

impl Remote for SimulatedRemote {
    fn authenticate(&mut self, username: &str, password: &str) -> RemoteFuture<'_, AuthGrant> {
        let username = username.to_string();
        let password = password.to_string();
        Box::pin(async move {
            self.check_online()?;
            debug!(user = %username, "simulated login");
            delay(self.auth_latency).await;
            Ok(self.authority.authenticate(&username, &password)?)
        })
    }

    fn fetch_records(&mut self) -> RemoteFuture<'_, Vec<Record>> {
        Box::pin(async move {
            self.check_online()?;
            delay(self.fetch_latency).await;
            let records = self.authority.records();
            debug!(count = records.len(), "simulated fetch");
            Ok(records)
        })
    }
}
