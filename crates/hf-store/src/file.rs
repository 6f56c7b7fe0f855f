//! JSON snapshot stores with atomic file replacement.

use crate::table::PostTable;
use crate::traits::{CursorStore, PostReader, PostStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hf_core::{FeedError, Mutation, MutationOutcome, PostRecord, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const POSTS_FILE: &str = "posts.json";
pub const CURSOR_FILE: &str = "cursor.json";

/// Write via a sibling tmp file, fsync, then rename over the target.
pub fn write_atomic(path: &Path, value: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(value)?;
        f.flush()?;
        f.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Run [`write_atomic`] on the blocking pool.
async fn persist(path: PathBuf, bytes: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| FeedError::Storage(format!("persist task failed: {e}")))??;
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PostsSnapshot {
    posts: Vec<PostRecord>,
}

/// Post store persisted as a single JSON snapshot.
///
/// A mutation is applied to a copy, written to disk, and only then swapped
/// in; a failed write leaves both the file and memory untouched. Readers keep
/// the current table while the write is in flight.
#[derive(Debug)]
pub struct FilePostStore {
    path: PathBuf,
    table: RwLock<PostTable>,
    writer: Mutex<()>,
}

impl FilePostStore {
    /// Open `<dir>/posts.json`, creating an empty store if it is missing.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(POSTS_FILE);
        let table = if path.exists() {
            let snapshot: PostsSnapshot = serde_json::from_slice(&fs::read(&path)?)?;
            let total = snapshot.posts.len();
            let valid: Vec<PostRecord> = snapshot
                .posts
                .into_iter()
                .filter(|r| {
                    let ok = r.is_well_formed();
                    if !ok {
                        warn!(uri = %r.uri, "dropping malformed post record");
                    }
                    ok
                })
                .collect();
            debug!(path = %path.display(), loaded = valid.len(), total, "opened post store");
            PostTable::from_records(valid)
        } else {
            PostTable::new()
        };
        Ok(Self { path, table: RwLock::new(table), writer: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PostReader for FilePostStore {
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
impl PostStore for FilePostStore {
    async fn apply_mutation(&self, mutation: &Mutation) -> Result<MutationOutcome> {
        let _writer = self.writer.lock().await;
        let mut next = self.table.read().clone();
        let outcome = next.apply(mutation);
        if outcome.deleted > 0 || outcome.inserted > 0 {
            let bytes = serde_json::to_vec(&PostsSnapshot { posts: next.records() })?;
            persist(self.path.clone(), bytes).await?;
            *self.table.write() = next;
        }
        Ok(outcome)
    }
}

/// Cursor store persisted as `{ "<service>": <cursor> }`.
#[derive(Debug)]
pub struct FileCursorStore {
    path: PathBuf,
    cursors: RwLock<BTreeMap<String, i64>>,
    writer: Mutex<()>,
}

impl FileCursorStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CURSOR_FILE);
        let cursors = if path.exists() {
            serde_json::from_slice(&fs::read(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, cursors: RwLock::new(cursors), writer: Mutex::new(()) })
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn load(&self, service: &str) -> Result<Option<i64>> {
        Ok(self.cursors.read().get(service).copied())
    }

    async fn save(&self, service: &str, cursor: i64) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut next = self.cursors.read().clone();
        next.insert(service.to_string(), cursor);
        persist(self.path.clone(), serde_json::to_vec_pretty(&next)?).await?;
        *self.cursors.write() = next;
        Ok(())
    }
}
