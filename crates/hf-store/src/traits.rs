use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hf_core::{Mutation, MutationOutcome, PostRecord, Result};

/// Read access to stored haiku posts.
#[async_trait]
pub trait PostReader: Send + Sync {
    /// Every stored record, in no particular order.
    async fn scan_all(&self) -> Result<Vec<PostRecord>>;

    /// Up to `limit` records strictly older than `before`, newest first,
    /// ties ordered by `cid` descending.
    async fn page(&self, limit: usize, before: Option<DateTime<Utc>>) -> Result<Vec<PostRecord>>;

    async fn len(&self) -> Result<usize>;
}

/// Write access, held only by the ingestion pipeline.
#[async_trait]
pub trait PostStore: PostReader {
    /// Apply all deletes, then all inserts, as one transaction. Inserts whose
    /// `uri` already exists are skipped. On error nothing is applied.
    async fn apply_mutation(&self, mutation: &Mutation) -> Result<MutationOutcome>;
}

/// Last committed upstream stream position per service.
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn load(&self, service: &str) -> Result<Option<i64>>;
    async fn save(&self, service: &str, cursor: i64) -> Result<()>;
}
