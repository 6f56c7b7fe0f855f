use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Unsupported algorithm: {0}")]
    UnknownFeed(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;
