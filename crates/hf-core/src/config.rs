use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub server: ServerConfig,
    pub feed: FeedSection,
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Identity of the published feed and paging limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub hostname: String,
    pub publisher_did: String,
    /// Defaults to `did:web:<hostname>` when unset.
    pub service_did: Option<String>,
    pub shortname: String,
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Posts and the stream cursor are kept in memory when unset.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub service: String,
    pub retention_hours: i64,
    pub debug_haiku: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            hostname: "example.com".into(),
            publisher_did: "did:example:alice".into(),
            service_did: None,
            shortname: "haiku".into(),
            default_limit: 50,
            max_limit: 100,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            service: "wss://bsky.network".into(),
            retention_hours: 48,
            debug_haiku: false,
        }
    }
}

impl FeedSection {
    pub fn service_did(&self) -> String {
        self.service_did
            .clone()
            .unwrap_or_else(|| format!("did:web:{}", self.hostname))
    }

    /// The `at://` URI under which the feed generator record is published.
    pub fn feed_uri(&self) -> String {
        format!(
            "at://{}/app.bsky.feed.generator/{}",
            self.publisher_did, self.shortname
        )
    }
}

impl FeedConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `HAIKU_FEED_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = var("HAIKU_FEED_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("HAIKU_FEED_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| FeedError::Config(format!("invalid port: {port}")))?;
        }
        if let Some(hostname) = var("HAIKU_FEED_HOSTNAME") {
            self.feed.hostname = hostname;
        }
        if let Some(did) = var("HAIKU_FEED_PUBLISHER_DID") {
            self.feed.publisher_did = did;
        }
        if let Some(did) = var("HAIKU_FEED_SERVICE_DID") {
            self.feed.service_did = Some(did);
        }
        if let Some(dir) = var("HAIKU_FEED_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(service) = var("HAIKU_FEED_SUBSCRIPTION_ENDPOINT") {
            self.ingest.service = service;
        }
        if let Some(debug) = var("HAIKU_FEED_DEBUG_HAIKU") {
            self.ingest.debug_haiku = matches!(debug.as_str(), "1" | "true" | "yes");
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.shortname.is_empty() || self.feed.shortname.len() > 15 {
            return Err(FeedError::Config(format!(
                "feed shortname must be 1-15 characters, got {:?}",
                self.feed.shortname
            )));
        }
        if self.feed.max_limit == 0 || self.feed.default_limit > self.feed.max_limit {
            return Err(FeedError::Config(format!(
                "default_limit {} must not exceed max_limit {}",
                self.feed.default_limit, self.feed.max_limit
            )));
        }
        if self.ingest.retention_hours <= 0 {
            return Err(FeedError::Config("retention_hours must be positive".into()));
        }
        Ok(())
    }
}
