// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync tests.

use tariff_core::{MemoryStore, Record, TariffValue};

use crate::config::Config;
use crate::context::SyncContext;
use crate::remote::SimulatedRemote;

pub type TestContext = SyncContext<MemoryStore, SimulatedRemote>;

/// Context over an empty in-memory store and a zero-latency canned authority.
pub fn context() -> TestContext {
    context_with(MemoryStore::new())
}

pub fn context_with(store: MemoryStore) -> TestContext {
    SyncContext::new(store, SimulatedRemote::default().instant(), Config::default())
}

/// A record with the given tag and codes.
pub fn tariff(value: &str, codes: &[&str]) -> Record {
    Record::new(
        TariffValue::tag(value),
        codes.iter().map(|c| c.to_string()).collect(),
    )
}
