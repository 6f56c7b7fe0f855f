//! Time-based expiry of stored posts.

use chrono::{DateTime, TimeDelta, Utc};
use hf_core::{FeedError, Result};

pub const DEFAULT_RETENTION_HOURS: i64 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    ttl: TimeDelta,
}

impl RetentionPolicy {
    pub fn new(ttl: TimeDelta) -> Self {
        Self { ttl }
    }

    pub fn from_hours(hours: i64) -> Result<Self> {
        TimeDelta::try_hours(hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .map(Self::new)
            .ok_or_else(|| FeedError::Config(format!("invalid retention window: {hours}h")))
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// True iff strictly more than the TTL has elapsed since `indexed_at`.
    pub fn is_expired(&self, indexed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - indexed_at > self.ttl
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::hours(DEFAULT_RETENTION_HOURS))
    }
}

/// [`RetentionPolicy::is_expired`] with the default 48-hour window.
pub fn is_expired(indexed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    RetentionPolicy::default().is_expired(indexed_at, now)
}
