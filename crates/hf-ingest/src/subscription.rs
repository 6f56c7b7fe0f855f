//! Folds upstream batches into the post store, one at a time.

use crate::pipeline::Ingestor;
use hf_core::{Batch, Clock, Result};
use hf_store::{CursorStore, PostStore};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// What one committed batch changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub seq: i64,
    pub expired: usize,
    pub deleted: usize,
    pub inserted: usize,
    pub skipped_existing: usize,
    pub rejected: usize,
}

/// Stream consumer for one upstream service.
///
/// The cursor for a batch is saved only after its mutation commits, so a
/// failed batch is retried from the previous checkpoint.
pub struct Subscription {
    service: String,
    ingestor: Ingestor,
    posts: Arc<dyn PostStore>,
    cursors: Arc<dyn CursorStore>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<()>,
}

impl Subscription {
    pub fn new(
        service: impl Into<String>,
        ingestor: Ingestor,
        posts: Arc<dyn PostStore>,
        cursors: Arc<dyn CursorStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service: service.into(),
            ingestor,
            posts,
            cursors,
            clock,
            in_flight: Mutex::new(()),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Last committed stream position; the transport resumes after it.
    pub async fn resume_cursor(&self) -> Result<Option<i64>> {
        self.cursors.load(&self.service).await
    }

    /// Process one batch to completion. Returns `None` for a redelivered
    /// batch at or before the committed cursor.
    pub async fn handle_batch(&self, batch: &Batch) -> Result<Option<IngestReport>> {
        let _guard = self.in_flight.lock().await;

        if let Some(committed) = self.cursors.load(&self.service).await? {
            if batch.seq <= committed {
                debug!(seq = batch.seq, committed, "skipping redelivered batch");
                return Ok(None);
            }
        }

        let now = self.clock.now();
        let snapshot = self.posts.scan_all().await?;
        let plan = self.ingestor.plan(&batch.ops, &snapshot, now);

        let outcome = if plan.mutation.is_empty() {
            Default::default()
        } else {
            self.posts.apply_mutation(&plan.mutation).await?
        };
        self.cursors.save(&self.service, batch.seq).await?;

        let report = IngestReport {
            seq: batch.seq,
            expired: plan.expired,
            deleted: outcome.deleted,
            inserted: outcome.inserted,
            skipped_existing: outcome.skipped_existing,
            rejected: plan.rejected,
        };
        if report.inserted > 0 || report.deleted > 0 {
            info!(
                seq = report.seq,
                inserted = report.inserted,
                deleted = report.deleted,
                expired = report.expired,
                "batch committed"
            );
        }
        Ok(Some(report))
    }

    /// Consume batches in order until the channel closes. Stops at the first
    /// failed batch and returns its error; its cursor is not advanced.
    pub async fn run(&self, mut batches: mpsc::Receiver<Batch>) -> Result<u64> {
        let mut committed = 0u64;
        while let Some(batch) = batches.recv().await {
            match self.handle_batch(&batch).await {
                Ok(Some(_)) => committed += 1,
                Ok(None) => {}
                Err(e) => {
                    warn!(seq = batch.seq, error = %e, "batch failed, stopping subscription");
                    return Err(e);
                }
            }
        }
        info!(service = %self.service, committed, "subscription stream closed");
        Ok(committed)
    }
}
