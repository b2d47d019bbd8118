// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The canned dataset served by the stub authority.
//!
//! Both the in-process simulated remote and the `tariff-remote` server answer
//! from an [`Authority`]. The JSON layout matches the seed files the server
//! accepts: `{ "users": [...], "tariffs": [...] }`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AuthError, StorageResult};
use crate::record::{Record, TariffValue};

/// Tokens accepted by session validation when nothing else is configured.
pub const DEFAULT_ALLOWED_TOKENS: [&str; 2] = ["fake-token-123456", "token-987654321"];

/// A user known to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub password: String,
    pub token: String,
}

impl Account {
    pub fn new(login: &str, password: &str, token: &str) -> Self {
        Account {
            login: login.to_string(),
            password: password.to_string(),
            token: token.to_string(),
        }
    }
}

/// What a successful login yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: String,
}

/// Accounts and the authoritative record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authority {
    #[serde(rename = "users", default)]
    accounts: Vec<Account>,
    #[serde(rename = "tariffs", default)]
    records: Vec<Record>,
}

impl Default for Authority {
    fn default() -> Self {
        Self::canned()
    }
}

impl Authority {
    pub fn new(accounts: Vec<Account>, records: Vec<Record>) -> Self {
        Authority { accounts, records }
    }

    /// The built-in dataset: two users and two tariffs.
    pub fn canned() -> Self {
        Authority {
            accounts: vec![
                Account::new("testuser", "password123", DEFAULT_ALLOWED_TOKENS[0]),
                Account::new("admin", "admin123", DEFAULT_ALLOWED_TOKENS[1]),
            ],
            records: vec![
                Record::new(
                    TariffValue::tag("T1"),
                    vec!["123456".into(), "654312".into()],
                )
                .with_id("1")
                .with_created_at("2025-06-20T19:00:00Z"),
                Record::new(TariffValue::tag("T3"), vec!["132356".into()])
                    .with_id("2")
                    .with_created_at("2025-06-19T18:30:00Z"),
            ],
        }
    }

    /// Loads a dataset from a JSON seed file.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Checks credentials.
    ///
    /// A known login with the wrong password is `InvalidCredentials`;
    /// anything else that does not match is `UserNotFound`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.login == username)
            .ok_or(AuthError::UserNotFound)?;

        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AuthGrant {
            token: account.token.clone(),
            user: account.login.clone(),
        })
    }

    /// The authoritative records, each marked processed.
    pub fn records(&self) -> Vec<Record> {
        self.records
            .iter()
            .cloned()
            .map(|r| r.with_processed(true))
            .collect()
    }

    /// Adds a record on the authority side, replacing the one with the same
    /// identity key if there is one.
    pub fn push_record(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.same_entity(&record)) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }
}

#[cfg(test)]
#[path = "authority_tests.rs"]
mod tests;
