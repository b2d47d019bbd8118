// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Clients for the remote tariff authority.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐
//! │ Session Mgr  │────►│      Remote      │
//! │ Reconciler   │◄────│     (trait)      │
//! └──────────────┘     └──────────────────┘
//!                          │          │
//!                          ▼          ▼
//!               ┌────────────┐  ┌─────────────────┐     ┌──────────────┐
//!               │ Simulated  │  │ WebSocketRemote │────►│ tariff-remote│
//!               │ (canned)   │  │  (Transport)    │◄────│   server     │
//!               └────────────┘  └─────────────────┘     └──────────────┘
//! ```
//!
//! The variant is chosen when the client is constructed; the session manager
//! and reconciler only see the [`Remote`] trait.

mod simulated;
mod transport;
mod websocket;

pub use simulated::{OfflineSwitch, SimulatedRemote};
pub use transport::{Transport, WebSocketTransport};
pub use websocket::WebSocketRemote;

use std::future::Future;
use std::pin::Pin;

use tariff_core::{AuthGrant, Record, RemoteResult};

/// Boxed future returned by [`Remote`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Request/response surface of the tariff authority.
///
/// No method retries; callers decide what to do with a failure.
pub trait Remote: Send {
    /// Exchanges credentials for a session token.
    ///
    /// A refused login is reported as [`tariff_core::RemoteError::Rejected`].
    fn authenticate(&mut self, username: &str, password: &str) -> RemoteFuture<'_, AuthGrant>;

    /// Fetches the authoritative record set. Every record is marked processed.
    fn fetch_records(&mut self) -> RemoteFuture<'_, Vec<Record>>;
}

impl<R: Remote + ?Sized> Remote for Box<R> {
    fn authenticate(&mut self, username: &str, password: &str) -> RemoteFuture<'_, AuthGrant> {
        (**self).authenticate(username, password)
    }

    fn fetch_records(&mut self) -> RemoteFuture<'_, Vec<Record>> {
        (**self).fetch_records()
    }
}
