//! In-memory post table with a recency index.

use chrono::{DateTime, Utc};
use hf_core::{Mutation, MutationOutcome, PostRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

type RecencyKey = (DateTime<Utc>, String, String);

/// Primary rows keyed by `uri` plus a `(indexed_at, cid, uri)` index.
/// Both change together, so readers never see one without the other.
#[derive(Debug, Clone, Default)]
pub struct PostTable {
    rows: BTreeMap<String, PostRecord>,
    by_recency: BTreeSet<RecencyKey>,
}

fn recency_key(r: &PostRecord) -> RecencyKey {
    (r.indexed_at, r.cid.clone(), r.uri.clone())
}

impl PostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = PostRecord>) -> Self {
        let mut table = Self::new();
        for r in records {
            table.insert(r);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.rows.contains_key(uri)
    }

    pub fn records(&self) -> Vec<PostRecord> {
        self.rows.values().cloned().collect()
    }

    /// Returns false if the `uri` is already present.
    pub fn insert(&mut self, record: PostRecord) -> bool {
        if self.contains(&record.uri) {
            return false;
        }
        self.by_recency.insert(recency_key(&record));
        self.rows.insert(record.uri.clone(), record);
        true
    }

    pub fn remove(&mut self, uri: &str) -> bool {
        match self.rows.remove(uri) {
            Some(r) => {
                self.by_recency.remove(&recency_key(&r));
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, mutation: &Mutation) -> MutationOutcome {
        let mut outcome = MutationOutcome::default();
        for uri in &mutation.to_delete {
            if self.remove(uri) {
                outcome.deleted += 1;
            }
        }
        for record in &mutation.to_insert {
            if self.insert(record.clone()) {
                outcome.inserted += 1;
            } else {
                outcome.skipped_existing += 1;
            }
        }
        outcome
    }

    pub fn page(&self, limit: usize, before: Option<DateTime<Utc>>) -> Vec<PostRecord> {
        let upper = match before {
            Some(ts) => Bound::Excluded((ts, String::new(), String::new())),
            None => Bound::Unbounded,
        };
        self.by_recency
            .range((Bound::Unbounded, upper))
            .rev()
            .take(limit)
            .filter_map(|(_, _, uri)| self.rows.get(uri).cloned())
            .collect()
    }
}
