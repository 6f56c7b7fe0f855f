//! Newline-delimited JSON batch source, one [`Batch`] per line.

use anyhow::Context as _;
use hf_core::Batch;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

pub fn parse_batch(line: &str) -> serde_json::Result<Batch> {
    serde_json::from_str(line)
}

/// Send every batch read from `reader`, skipping blank lines. Stops early
/// without error if the receiver is dropped.
pub async fn send_batches<R>(reader: R, tx: mpsc::Sender<Batch>) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut sent = 0;
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let batch = parse_batch(&line).with_context(|| format!("invalid batch on line {line_no}"))?;
        if tx.send(batch).await.is_err() {
            debug!(line_no, "batch receiver closed");
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

pub async fn replay_file(path: impl AsRef<Path>, tx: mpsc::Sender<Batch>) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;
    send_batches(BufReader::new(file), tx).await
}
