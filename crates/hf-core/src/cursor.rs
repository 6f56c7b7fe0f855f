//! Feed pagination cursors: the millisecond epoch of a record's `indexedAt`.

use crate::error::{FeedError, Result};
use chrono::{DateTime, Utc};

pub fn encode(indexed_at: DateTime<Utc>) -> String {
    indexed_at.timestamp_millis().to_string()
}

pub fn decode(cursor: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = cursor
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidCursor(cursor.to_string()))?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| FeedError::InvalidCursor(cursor.to_string()))
}
