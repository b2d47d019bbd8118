// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tariff records and their identity key.
//!
//! Records are persisted as plain JSON objects with the field names
//! `id`, `val`, `qrs`, `processed` and `created`. Every field is optional on
//! the way in, and fields this crate does not know about are carried through
//! untouched in [`Record::extra`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque record identifier, assigned by the authority or on local creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// Classification tag of a tariff.
///
/// Usually one of [`TariffValue::KNOWN_TAGS`], but persisted data may carry
/// any string, a number, or something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TariffValue {
    Tag(String),
    Number(serde_json::Number),
    Other(Value),
}

impl TariffValue {
    /// Tags the scanning UI offers.
    pub const KNOWN_TAGS: [&'static str; 3] = ["T1", "T2", "T3"];

    /// Creates a tag value.
    pub fn tag(tag: impl Into<String>) -> Self {
        TariffValue::Tag(tag.into())
    }

    /// Returns true if this is one of the tags the UI offers.
    pub fn is_known(&self) -> bool {
        matches!(self, TariffValue::Tag(t) if Self::KNOWN_TAGS.contains(&t.as_str()))
    }

    /// Canonical comparison form, or `None` when the value can never equal
    /// another one (objects and arrays).
    fn canonical(&self) -> Option<String> {
        match self {
            TariffValue::Tag(s) => Some(format!("s:{s}")),
            TariffValue::Number(n) => n.as_f64().map(|f| format!("n:{f}")),
            TariffValue::Other(Value::Bool(b)) => Some(format!("b:{b}")),
            TariffValue::Other(_) => None,
        }
    }
}

impl fmt::Display for TariffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TariffValue::Tag(s) => write!(f, "{s}"),
            TariffValue::Number(n) => write!(f, "{n}"),
            TariffValue::Other(v) => write!(f, "{v}"),
        }
    }
}

/// The (value, codes-in-order) pair that decides whether two records denote
/// the same logical entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    value: String,
    codes: String,
}

/// A scanned tariff.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "val", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TariffValue>,
    #[serde(rename = "qrs", default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<String>>,
    /// Set by the authority once it has acknowledged the record.
    #[serde(default, deserialize_with = "null_as_false")]
    pub processed: bool,
    /// RFC 3339 timestamp of the scan.
    #[serde(rename = "created", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Fields not modelled here, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Record {
    /// Creates an unpersisted, unprocessed record.
    pub fn new(value: TariffValue, codes: Vec<String>) -> Self {
        Record {
            value: Some(value),
            codes: Some(codes),
            ..Record::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_processed(mut self, processed: bool) -> Self {
        self.processed = processed;
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Returns the identity key, or `None` for records that cannot be
    /// identified (missing value, or a value that never compares equal).
    ///
    /// Codes are compared by their JSON serialization, so order matters and
    /// an absent list only matches another absent list.
    pub fn identity_key(&self) -> Option<IdentityKey> {
        let value = self.value.as_ref()?.canonical()?;
        let codes = serde_json::to_string(&self.codes).ok()?;
        Some(IdentityKey { value, codes })
    }

    /// Returns true if both records denote the same logical entity.
    pub fn same_entity(&self, other: &Record) -> bool {
        match (self.identity_key(), other.identity_key()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Applies a partial update in place.
    pub fn apply_patch(&mut self, patch: &RecordPatch) {
        if let Some(ref value) = patch.value {
            self.value = Some(value.clone());
        }
        if let Some(ref codes) = patch.codes {
            self.codes = Some(codes.clone());
        }
        if let Some(processed) = patch.processed {
            self.processed = processed;
        }
        if let Some(ref created_at) = patch.created_at {
            self.created_at = Some(created_at.clone());
        }
    }
}

/// Partial update for a record. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(rename = "val", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TariffValue>,
    #[serde(rename = "qrs", default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,
    #[serde(rename = "created", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Serializes records to plain JSON for persistence.
pub fn to_plain(records: &[Record]) -> serde_json::Result<Value> {
    serde_json::to_value(records)
}

/// Result of reading a persisted collection leniently.
#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<Record>,
    /// Entries that could not be read as records, with the reason.
    pub rejected: Vec<(Value, String)>,
}

/// Reads a persisted collection, keeping every entry that is a record.
///
/// Anything that is not an array yields no records; array entries that do not
/// decode are reported in [`Decoded::rejected`] instead of failing the whole
/// collection.
pub fn from_plain(value: Value) -> Decoded {
    let mut decoded = Decoded::default();
    let Value::Array(items) = value else {
        decoded
            .rejected
            .push((value, "persisted collection is not an array".to_string()));
        return decoded;
    };
    for item in items {
        match serde_json::from_value::<Record>(item.clone()) {
            Ok(record) => decoded.records.push(record),
            Err(e) => decoded.rejected.push((item, e.to_string())),
        }
    }
    decoded
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
