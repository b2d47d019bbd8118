// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! High-level client: one context, one session manager, one reconciler.
//!
//! This is what presentation code holds on to. Each instance is fully
//! independent; two clients over the same store file see each other's
//! writes only through the store.

use tariff_core::{KvStore, Record, RecordId, RecordPatch, SqliteStore};

use crate::config::Config;
use crate::context::SyncContext;
use crate::error::{Error, Result};
use crate::reconciler::{Reconciler, SyncOutcome};
use crate::remote::{Remote, SimulatedRemote, WebSocketRemote};
use crate::session::{Session, SessionManager, SessionState};

/// Offline-first tariff client.
pub struct Client<S: KvStore = SqliteStore, R: Remote = Box<dyn Remote>> {
    ctx: SyncContext<S, R>,
    session: SessionManager,
    reconciler: Reconciler,
}

impl Client {
    /// Builds a client from configuration.
    ///
    /// The store is the SQLite file at `store_path`, opened on first use.
    /// The remote is a WebSocket authority when `remote.url` is set and the
    /// simulated one otherwise.
    pub fn from_config(config: Config) -> Result<Self> {
        if let Some(msg) = config.remote.validate_url() {
            return Err(Error::Config(msg));
        }
        let store = SqliteStore::open(&config.store_path);
        let remote: Box<dyn Remote> = match &config.remote.url {
            Some(url) => Box::new(WebSocketRemote::new(url.clone())),
            None => Box::new(SimulatedRemote::from_config(&config.remote)),
        };
        Ok(Client::new(SyncContext::new(store, remote, config)))
    }
}

impl<S: KvStore, R: Remote> Client<S, R> {
    pub fn new(ctx: SyncContext<S, R>) -> Self {
        let session = SessionManager::new(ctx.config.allowed_tokens.iter().cloned());
        let reconciler = Reconciler::new(ctx.config.merge_policy);
        Client {
            ctx,
            session,
            reconciler,
        }
    }

    /// Process start: restores a persisted session and loads persisted
    /// records. Returns whether a session was restored.
    pub fn start(&mut self) -> bool {
        let restored = self.session.restore_session(&mut self.ctx);
        self.reconciler.load_persisted(&mut self.ctx);
        restored
    }

    pub fn context(&self) -> &SyncContext<S, R> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SyncContext<S, R> {
        &mut self.ctx
    }

    // Session

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        self.session.login(&mut self.ctx, username, password).await
    }

    pub fn restore_session(&mut self) -> bool {
        self.session.restore_session(&mut self.ctx)
    }

    pub fn is_token_valid(&self, token: &str) -> bool {
        self.session.is_token_valid(token)
    }

    pub fn check_token(&mut self) -> bool {
        self.session.check_token(&mut self.ctx)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout(&mut self.ctx)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // Records

    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        self.reconciler.sync_with_remote(&mut self.ctx).await
    }

    pub fn add_record(&mut self, record: Record) -> Result<RecordId> {
        self.reconciler.add_record(&mut self.ctx, record)
    }

    pub fn load_persisted(&mut self) -> &[Record] {
        self.reconciler.load_persisted(&mut self.ctx)
    }

    pub fn synchronize_local(&mut self) -> Result<&[Record]> {
        self.reconciler.synchronize_local(&mut self.ctx)
    }

    pub fn update_record(&mut self, id: &RecordId, patch: &RecordPatch) -> Result<Record> {
        self.reconciler.update_record(&mut self.ctx, id, patch)
    }

    pub fn remove_record(&mut self, id: &RecordId) -> Result<Record> {
        self.reconciler.remove_record(&mut self.ctx, id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.reconciler.get(id)
    }

    pub fn records(&self) -> &[Record] {
        self.reconciler.records()
    }

    pub fn pending(&self) -> Vec<&Record> {
        self.reconciler.pending()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
