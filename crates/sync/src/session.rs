// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session management.
//!
//! State machine:
//!
//! ```text
//!                 login()                 ok
//! Unauthenticated ──────► Authenticating ─────► Authenticated
//!        ▲                      │                     │
//!        └──────── error ───────┘                     │
//!        └─────── logout() / failed restore/check ────┘
//! ```
//!
//! The current session lives in memory and is mirrored under
//! [`tariff_core::SESSION_KEY`] in the local store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tariff_core::{AuthGrant, KvStore};

use crate::context::SyncContext;
use crate::error::Result;
use crate::remote::Remote;

/// An authenticated token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Session {
            token: token.into(),
            user: user.into(),
        }
    }
}

impl From<AuthGrant> for Session {
    fn from(grant: AuthGrant) -> Self {
        Session {
            token: grant.token,
            user: grant.user,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Owns the current session.
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
    session: Option<Session>,
    allowed_tokens: HashSet<String>,
}

impl SessionManager {
    pub fn new<I, T>(allowed_tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        SessionManager {
            state: SessionState::Unauthenticated,
            session: None,
            allowed_tokens: allowed_tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Returns true if `token` is on the allow-list.
    pub fn is_token_valid(&self, token: &str) -> bool {
        self.allowed_tokens.contains(token)
    }

    /// Logs in through the remote and persists the session.
    ///
    /// On any failure the manager ends up unauthenticated and nothing is
    /// written. A refused login is [`crate::Error::Auth`].
    pub async fn login<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        self.session = None;
        self.state = SessionState::Authenticating;
        debug!(user = username, "logging in");

        let grant = match ctx.remote.authenticate(username, password).await {
            Ok(grant) => grant,
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                warn!(user = username, error = %e, "login failed");
                return Err(e.into());
            }
        };

        let session = Session::from(grant);
        if let Err(e) = ctx.store.save_session(&session) {
            self.state = SessionState::Unauthenticated;
            warn!(error = %e, "could not persist session");
            return Err(e.into());
        }

        info!(user = %session.user, "logged in");
        self.session = Some(session.clone());
        self.state = SessionState::Authenticated;
        Ok(session)
    }

    /// Restores a persisted session.
    ///
    /// Returns true when a persisted session with an allowed token was found.
    /// A persisted session that is malformed or carries an unknown token is
    /// deleted. With nothing persisted this has no side effects.
    pub fn restore_session<S: KvStore, R: Remote>(&mut self, ctx: &mut SyncContext<S, R>) -> bool {
        let Some(value) = ctx.store.load_session() else {
            return false;
        };

        match serde_json::from_value::<Session>(value) {
            Ok(session) if self.is_token_valid(&session.token) => {
                info!(user = %session.user, "session restored");
                self.session = Some(session);
                self.state = SessionState::Authenticated;
                true
            }
            Ok(_) => {
                warn!("persisted token is not valid, discarding session");
                self.discard(ctx);
                false
            }
            Err(e) => {
                warn!(error = %e, "persisted session is unreadable, discarding it");
                self.discard(ctx);
                false
            }
        }
    }

    /// Re-validates the in-memory token, logging out if it is no longer
    /// allowed. Returns true while the session stays valid.
    pub fn check_token<S: KvStore, R: Remote>(&mut self, ctx: &mut SyncContext<S, R>) -> bool {
        let valid = self
            .session
            .as_ref()
            .is_some_and(|s| self.is_token_valid(&s.token));
        if !valid && self.session.is_some() {
            info!("token no longer valid, logging out");
            self.discard(ctx);
        }
        valid
    }

    /// Clears the session in memory and in the store. Safe to call when
    /// already logged out.
    ///
    /// Memory is cleared even when the store delete fails; the error is
    /// returned so the caller knows a stale session remains on disk.
    pub fn logout<S: KvStore, R: Remote>(&mut self, ctx: &mut SyncContext<S, R>) -> Result<()> {
        if let Some(session) = self.session.take() {
            info!(user = %session.user, "logged out");
        }
        self.state = SessionState::Unauthenticated;
        ctx.store.clear_session()?;
        Ok(())
    }

    fn discard<S: KvStore, R: Remote>(&mut self, ctx: &mut SyncContext<S, R>) {
        if let Err(e) = self.logout(ctx) {
            warn!(error = %e, "could not delete persisted session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
