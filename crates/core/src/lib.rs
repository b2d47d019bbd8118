// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tariff-core: Shared library for offline-first tariff sync
//!
//! This crate provides the record model, the merge algorithms, local
//! key-value persistence and the wire protocol used by both the sync
//! client and the tariff-remote authority.

pub mod authority;
pub mod error;
pub mod id;
pub mod merge;
pub mod protocol;
pub mod record;
pub mod store;

pub use authority::{Account, AuthGrant, Authority, DEFAULT_ALLOWED_TOKENS};
pub use error::{AuthError, RemoteError, RemoteResult, StorageError, StorageResult};
pub use merge::{reconcile, MergePolicy};
pub use protocol::{ClientMessage, ServerMessage};
pub use record::{IdentityKey, Record, RecordId, RecordPatch, TariffValue};
pub use store::{KvStore, MemoryStore, SqliteStore, RECORDS_KEY, SESSION_KEY};
