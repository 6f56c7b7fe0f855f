//! Shared types for the haiku feed: post records, stream operations,
//! configuration, errors, and the clock.

pub mod clock;
pub mod config;
pub mod cursor;
pub mod error;
pub mod post;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use post::{PostRecord, HAIKU_LINE_SYLLABLES, HAIKU_SYLLABLES};
pub use types::{Batch, CreateOp, DeleteOp, Mutation, MutationOutcome, Operations, PostContent};
