//! Ingestion pipeline: batch planning, retention, and the stream fold.

pub mod pipeline;
pub mod retention;
pub mod source;
pub mod subscription;

pub use pipeline::{IngestPlan, Ingestor};
pub use retention::{is_expired, RetentionPolicy};
pub use subscription::{IngestReport, Subscription};
