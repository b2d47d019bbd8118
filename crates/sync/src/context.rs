// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit process context shared by the session manager and reconciler.

use tariff_core::KvStore;

use crate::config::Config;
use crate::local_store::LocalStore;
use crate::remote::Remote;

/// Everything the core components need from the outside world.
///
/// Built once and passed by `&mut` to every operation, so independent
/// instances never share hidden state.
pub struct SyncContext<S: KvStore, R: Remote> {
    pub store: LocalStore<S>,
    pub remote: R,
    pub config: Config,
}

impl<S: KvStore, R: Remote> SyncContext<S, R> {
    pub fn new(store: S, remote: R, config: Config) -> Self {
        SyncContext {
            store: LocalStore::new(store),
            remote,
            config,
        }
    }
}
