//! Application state shared across all handlers.

use hf_core::FeedConfig;
use hf_store::{MemoryPostStore, PostReader};
use std::sync::Arc;

/// Read-only view of the post store plus feed identity.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FeedConfig>,
    pub posts: Arc<dyn PostReader>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: FeedConfig, posts: Arc<dyn PostReader>) -> Self {
        Self {
            config: Arc::new(config),
            posts,
            start_time: std::time::Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FeedConfig::default(), Arc::new(MemoryPostStore::new()))
    }
}
