// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tariff-sync: offline-first synchronization of tariff records
//!
//! A [`Client`] keeps an in-memory record collection, mirrors every change
//! into a local key-value store, and merges the remote authority's records
//! in when asked. Remote failures never touch local state.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod local_store;
pub mod reconciler;
pub mod remote;
pub mod session;

pub use client::Client;
pub use config::{Config, RemoteConfig};
pub use context::SyncContext;
pub use error::{Error, Result};
pub use local_store::LocalStore;
pub use reconciler::{Reconciler, SyncOutcome};
pub use remote::{OfflineSwitch, Remote, SimulatedRemote, WebSocketRemote};
pub use session::{Session, SessionManager, SessionState};

#[cfg(test)]
mod test_helpers;
