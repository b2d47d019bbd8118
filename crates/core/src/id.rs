// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for records created on this device.

use sha2::{Digest, Sha256};

use crate::record::{Record, RecordId};

/// Prefix of identifiers minted locally, before the authority assigns one.
pub const LOCAL_ID_PREFIX: &str = "t";

/// Generate a record ID from its value, codes and creation timestamp.
/// Format: t-{hash} where hash is the first 8 hex chars of SHA256(value + codes + created).
pub fn generate_id(record: &Record, created_at: &str) -> String {
    let value = record
        .value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default();
    let codes = record.codes.as_deref().unwrap_or_default().join(",");
    let input = format!("{value}|{codes}|{created_at}");
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", LOCAL_ID_PREFIX, hex::encode(&hash[..4]))
}

/// Generate a unique ID, appending an incrementing suffix on collision.
pub fn generate_unique_id<F>(record: &Record, created_at: &str, exists: F) -> RecordId
where
    F: Fn(&RecordId) -> bool,
{
    let base = RecordId::Text(generate_id(record, created_at));
    if !exists(&base) {
        return base;
    }

    let mut suffix = 2;
    loop {
        let id = RecordId::Text(format!("{base}-{suffix}"));
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
