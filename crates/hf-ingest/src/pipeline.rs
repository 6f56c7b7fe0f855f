//! Batch planning: which records enter and leave the store.

use crate::retention::RetentionPolicy;
use chrono::{DateTime, TimeDelta, Utc};
use hf_core::{Mutation, Operations, PostRecord};
use hf_haiku::HaikuExtractor;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// A [`Mutation`] plus what went into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestPlan {
    pub mutation: Mutation,
    pub expired: usize,
    pub explicit_deletes: usize,
    pub rejected: usize,
}

/// Turns operation batches into store mutations. Holds no store state.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    extractor: HaikuExtractor,
    retention: RetentionPolicy,
}

impl Ingestor {
    pub fn new(extractor: HaikuExtractor, retention: RetentionPolicy) -> Self {
        Self { extractor, retention }
    }

    pub fn extractor(&self) -> &HaikuExtractor {
        &self.extractor
    }

    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// `{toDelete, toInsert}` for one batch against the current snapshot.
    pub fn ingest(&self, ops: &Operations, snapshot: &[PostRecord], now: DateTime<Utc>) -> Mutation {
        self.plan(ops, snapshot, now).mutation
    }

    pub fn plan(&self, ops: &Operations, snapshot: &[PostRecord], now: DateTime<Utc>) -> IngestPlan {
        let expired: BTreeSet<String> = snapshot
            .iter()
            .filter(|r| self.retention.is_expired(r.indexed_at, now))
            .map(|r| r.uri.clone())
            .collect();
        let explicit: BTreeSet<String> = ops.deletes.iter().map(|d| d.uri.clone()).collect();

        let mut plan = IngestPlan {
            expired: expired.len(),
            explicit_deletes: explicit.len(),
            ..Default::default()
        };
        plan.mutation.to_delete = expired.into_iter().chain(explicit).collect();

        let mut indexed_at = next_indexed_at(snapshot, now);
        let mut seen = HashSet::new();
        for create in &ops.creates {
            // Stored text and haiku are both lowercase, so re-extracting
            // `post_text` yields the stored haiku.
            let text = create.record.text.to_lowercase();
            let Some(haiku) = self.extractor.extract(&text) else {
                plan.rejected += 1;
                continue;
            };
            if !seen.insert(create.uri.as_str()) {
                debug!(uri = %create.uri, "duplicate create in batch, keeping first");
                continue;
            }
            plan.mutation.to_insert.push(PostRecord::new(
                &create.uri,
                &create.cid,
                indexed_at,
                &text,
                haiku.to_text(),
            ));
            indexed_at += TimeDelta::milliseconds(1);
        }
        plan
    }
}

/// First free `indexed_at` for this batch: `now`, or one millisecond past the
/// newest stored record. Every insert gets a distinct millisecond so a cursor
/// never splits a group of equal timestamps.
fn next_indexed_at(snapshot: &[PostRecord], now: DateTime<Utc>) -> DateTime<Utc> {
    snapshot
        .iter()
        .map(|r| r.indexed_at + TimeDelta::milliseconds(1))
        .max()
        .map_or(now, |after_newest| after_newest.max(now))
}
