use crate::table::PostTable;
use crate::traits::{CursorStore, PostReader, PostStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hf_core::{Mutation, MutationOutcome, PostRecord, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory post store.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    table: RwLock<PostTable>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = PostRecord>) -> Self {
        Self { table: RwLock::new(PostTable::from_records(records)) }
    }
}

#[async_trait]
impl PostReader for MemoryPostStore {
    async fn scan_all(&self) -> Result<Vec<PostRecord>> {
        Ok(self.table.read().records())
    }

    async fn page(&self, limit: usize, before: Option<DateTime<Utc>>) -> Result<Vec<PostRecord>> {
        Ok(self.table.read().page(limit, before))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.table.read().len())
    }

}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn apply_mutation(&self, mutation: &Mutation) -> Result<MutationOutcome> {
        Ok(self.table.write().apply(mutation))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursors: RwLock<HashMap<String, i64>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self, service: &str) -> Result<Option<i64>> {
        Ok(self.cursors.read().get(service).copied())
    }

    async fn save(&self, service: &str, cursor: i64) -> Result<()> {
        self.cursors.write().insert(service.to_string(), cursor);
        Ok(())
    }
}
