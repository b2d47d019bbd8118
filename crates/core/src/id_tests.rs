// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::record::TariffValue;

fn sample() -> Record {
    Record::new(TariffValue::tag("T1"), vec!["123456".into()])
}

#[test]
fn generate_id_format() {
    let id = generate_id(&sample(), "2025-06-20T19:00:00Z");
    assert!(id.starts_with("t-"));
    assert_eq!(id.len(), 10);
    assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_id_is_deterministic() {
    let a = generate_id(&sample(), "2025-06-20T19:00:00Z");
    let b = generate_id(&sample(), "2025-06-20T19:00:00Z");
    assert_eq!(a, b);
}

#[test]
fn generate_id_differs_by_timestamp() {
    let a = generate_id(&sample(), "2025-06-20T19:00:00Z");
    let b = generate_id(&sample(), "2025-06-20T19:00:01Z");
    assert_ne!(a, b);
}

#[test]
fn generate_id_handles_empty_record() {
    let id = generate_id(&Record::default(), "2025-06-20T19:00:00Z");
    assert!(id.starts_with("t-"));
}

#[test]
fn unique_id_without_collision() {
    let id = generate_unique_id(&sample(), "2025-06-20T19:00:00Z", |_| false);
    assert_eq!(
        id,
        RecordId::Text(generate_id(&sample(), "2025-06-20T19:00:00Z"))
    );
}

#[test]
fn unique_id_appends_suffix_on_collision() {
    let base = RecordId::Text(generate_id(&sample(), "2025-06-20T19:00:00Z"));
    let taken = [base.clone(), RecordId::Text(format!("{base}-2"))];
    let id = generate_unique_id(&sample(), "2025-06-20T19:00:00Z", |id| {
        taken.contains(id)
    });
    assert_eq!(id, RecordId::Text(format!("{base}-3")));
}
