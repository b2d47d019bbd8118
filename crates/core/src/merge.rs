// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merging record collections by identity key.
//!
//! Merge rules (conflict-aware, the default):
//! - The preferred side is kept in full and in order.
//! - Records from the other side are appended, in order, unless the preferred
//!   side or an earlier appended record has the same identity key.
//! - Records without an identity key are never treated as duplicates.
//!
//! Merging an already-merged collection with nothing is a no-op.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::{IdentityKey, Record};

/// Merges `remote` and `local`; remote wins every identity-key match.
///
/// The result is `remote` unchanged followed by the records of `local`
/// whose identity key is not present in `remote`, in `local`'s order. A key
/// repeated within `local` is appended at its first occurrence only.
pub fn reconcile(remote: &[Record], local: &[Record]) -> Vec<Record> {
    let mut taken: HashSet<IdentityKey> =
        remote.iter().filter_map(Record::identity_key).collect();
    let mut merged = Vec::with_capacity(remote.len() + local.len());
    merged.extend_from_slice(remote);

    for record in local {
        match record.identity_key() {
            // Keyless records never deduplicate away
            None => merged.push(record.clone()),
            Some(key) => {
                if taken.insert(key) {
                    merged.push(record.clone());
                }
            }
        }
    }

    merged
}

/// Which copy of the collection survives a sync with the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Remote wins identity-key matches; unmatched local records are kept.
    #[default]
    RemoteWinsOnMatch,
    /// The remote collection replaces everything held locally.
    RemoteReplacesAll,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::RemoteWinsOnMatch => "remote-wins-on-match",
            MergePolicy::RemoteReplacesAll => "remote-replaces-all",
        }
    }

    /// Merges according to this policy.
    pub fn merge(&self, remote: &[Record], local: &[Record]) -> Vec<Record> {
        match self {
            MergePolicy::RemoteWinsOnMatch => reconcile(remote, local),
            MergePolicy::RemoteReplacesAll => remote.to_vec(),
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote-wins-on-match" => Ok(MergePolicy::RemoteWinsOnMatch),
            "remote-replaces-all" => Ok(MergePolicy::RemoteReplacesAll),
            other => Err(format!(
                "invalid merge policy: '{other}'\n  hint: valid policies are: remote-wins-on-match, remote-replaces-all"
            )),
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
