// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record reconciliation.
//!
//! The reconciler owns the in-memory collection. Every mutation rewrites
//! the whole collection under [`tariff_core::RECORDS_KEY`] before the new
//! state is published, so the store never holds a partial write.
//!
//! Sync rules:
//! - The local side is the in-memory collection merged with the persisted
//!   one (in-memory wins identity matches)
//! - The authority's records are merged over it per [`MergePolicy`]
//! - If the authority cannot be reached nothing is written or published and
//!   the persisted collection is returned as a degraded result

use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use tariff_core::id::generate_unique_id;
use tariff_core::{reconcile, KvStore, MergePolicy, Record, RecordId, RecordPatch, RemoteError};

use crate::context::SyncContext;
use crate::error::{Error, Result};
use crate::remote::Remote;

/// Result of [`Reconciler::sync_with_remote`].
#[derive(Debug)]
pub enum SyncOutcome {
    /// The merged collection, now persisted and published.
    Merged(Vec<Record>),
    /// The authority could not be reached. `records` is the last persisted
    /// collection; nothing was changed.
    Degraded {
        records: Vec<Record>,
        error: RemoteError,
    },
}

impl SyncOutcome {
    pub fn records(&self) -> &[Record] {
        match self {
            SyncOutcome::Merged(records) | SyncOutcome::Degraded { records, .. } => records,
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            SyncOutcome::Merged(records) | SyncOutcome::Degraded { records, .. } => records,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SyncOutcome::Degraded { .. })
    }

    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            SyncOutcome::Merged(_) => None,
            SyncOutcome::Degraded { error, .. } => Some(error),
        }
    }
}

/// Owns the in-memory record collection.
#[derive(Debug, Default)]
pub struct Reconciler {
    records: Vec<Record>,
    policy: MergePolicy,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Reconciler {
    pub fn new(policy: MergePolicy) -> Self {
        Reconciler {
            records: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// The current in-memory collection.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id.as_ref() == Some(id))
    }

    /// Records the authority has not acknowledged yet.
    pub fn pending(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| !r.processed).collect()
    }

    /// Loads the persisted collection into memory and returns it.
    pub fn load_persisted<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
    ) -> &[Record] {
        self.records = ctx.store.load_records();
        debug!(count = self.records.len(), "loaded persisted records");
        &self.records
    }

    /// Merges the authority's records into local state, persists the
    /// result and publishes it.
    ///
    /// A failed fetch is not an error: it yields [`SyncOutcome::Degraded`]
    /// with the persisted collection. Only a failed write is an error, in
    /// which case memory is left as it was.
    pub async fn sync_with_remote<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
    ) -> Result<SyncOutcome> {
        let remote = match ctx.remote.fetch_records().await {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "fetch failed, falling back to persisted records");
                let records = ctx.store.load_records();
                return Ok(SyncOutcome::Degraded { records, error });
            }
        };

        let local = self.local_view(ctx);
        let merged = self.policy.merge(&remote, &without_held(&local, &remote));
        debug!(
            remote = remote.len(),
            local = local.len(),
            merged = merged.len(),
            policy = %self.policy,
            "merged with authority"
        );

        self.commit(ctx, merged.clone())?;
        Ok(SyncOutcome::Merged(merged))
    }

    /// Merges the in-memory collection with the persisted one (in-memory
    /// wins), persists and publishes the result.
    pub fn synchronize_local<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
    ) -> Result<&[Record]> {
        let merged = self.local_view(ctx);
        self.commit(ctx, merged)?;
        Ok(&self.records)
    }

    /// Appends a record and persists the whole collection.
    ///
    /// A record without an id gets a locally generated one, and one without
    /// a creation time is stamped with the current time. If the write fails
    /// the record is not kept.
    pub fn add_record<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
        mut record: Record,
    ) -> Result<RecordId> {
        let created_at = record.created_at.get_or_insert_with(now).clone();
        let id = match record.id.clone() {
            Some(id) => id,
            None => {
                let id = generate_unique_id(&record, &created_at, |candidate| {
                    self.get(candidate).is_some()
                });
                record.id = Some(id.clone());
                id
            }
        };

        self.records.push(record);
        if let Err(e) = ctx.store.save_records(&self.records) {
            self.records.pop();
            return Err(e.into());
        }
        debug!(%id, "added record");
        Ok(id)
    }

    /// Applies `patch` to the record with `id` and persists the collection.
    pub fn update_record<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<Record> {
        let index = self.position(id)?;
        let previous = self.records[index].clone();
        self.records[index].apply_patch(patch);

        if let Err(e) = ctx.store.save_records(&self.records) {
            self.records[index] = previous;
            return Err(e.into());
        }
        debug!(%id, "updated record");
        Ok(self.records[index].clone())
    }

    /// Removes the record with `id` and persists the collection.
    pub fn remove_record<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
        id: &RecordId,
    ) -> Result<Record> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);

        if let Err(e) = ctx.store.save_records(&self.records) {
            self.records.insert(index, removed);
            return Err(e.into());
        }
        debug!(%id, "removed record");
        Ok(removed)
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id.as_ref() == Some(id))
            .ok_or_else(|| Error::RecordNotFound(id.clone()))
    }

    /// The in-memory collection merged with the persisted one, in-memory
    /// first. Persisted records memory already holds are skipped.
    fn local_view<S: KvStore, R: Remote>(&self, ctx: &mut SyncContext<S, R>) -> Vec<Record> {
        let persisted = ctx.store.load_records();
        reconcile(&self.records, &without_held(&persisted, &self.records))
    }

    /// Persists `records`, then publishes them.
    fn commit<S: KvStore, R: Remote>(
        &mut self,
        ctx: &mut SyncContext<S, R>,
        records: Vec<Record>,
    ) -> Result<()> {
        ctx.store.save_records(&records)?;
        self.records = records;
        Ok(())
    }
}

/// Returns true if `held` already contains `record`: the same id, or an
/// identical record when neither side has an id.
fn is_held(held: &[Record], record: &Record) -> bool {
    held.iter().any(|h| match (&h.id, &record.id) {
        (Some(a), Some(b)) => a == b,
        (None, None) => h == record,
        _ => false,
    })
}

/// `records` minus those `held` already contains.
fn without_held(records: &[Record], held: &[Record]) -> Vec<Record> {
    records
        .iter()
        .filter(|r| !is_held(held, r))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
