//! Haiku extractor: sanitize, tokenize, precheck the total, pack.

use crate::pack::{self, Haiku, Rejection};
use crate::sanitize::sanitize;
use crate::syllables::{EnglishSyllableCounter, SyllableCounter};
use crate::tokenize::{tokenize, total_syllables};
use hf_core::HAIKU_SYLLABLES;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, trace};

/// Extraction counters.
#[derive(Debug, Default)]
pub struct ExtractStats {
    extracted: AtomicU64,
    packed: AtomicU64,
    accepted: AtomicU64,
}

impl ExtractStats {
    /// Texts seen.
    pub fn extracted(&self) -> u64 {
        self.extracted.load(Ordering::Relaxed)
    }

    /// Texts that passed the 17-syllable precheck and reached the packer.
    pub fn packed(&self) -> u64 {
        self.packed.load(Ordering::Relaxed)
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }
}

/// Detects haiku in post text. Cheap to clone; clones share counters.
#[derive(Clone)]
pub struct HaikuExtractor {
    counter: Arc<dyn SyllableCounter>,
    debug: bool,
    stats: Arc<ExtractStats>,
}

impl HaikuExtractor {
    pub fn new(counter: Arc<dyn SyllableCounter>) -> Self {
        Self { counter, debug: false, stats: Arc::new(ExtractStats::default()) }
    }

    pub fn english() -> Self {
        Self::new(Arc::new(EnglishSyllableCounter::new()))
    }

    /// Log every accepted haiku. Never changes results.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn stats(&self) -> &ExtractStats {
        &self.stats
    }

    /// The haiku in `text`, if it scans as 5-7-5.
    pub fn extract(&self, text: &str) -> Option<Haiku> {
        self.try_extract(text).ok()
    }

    /// Like [`extract`](Self::extract), with the reason for rejection.
    pub fn try_extract(&self, text: &str) -> Result<Haiku, Rejection> {
        self.stats.extracted.fetch_add(1, Ordering::Relaxed);

        let tokens = tokenize(&sanitize(text), self.counter.as_ref());
        let total = total_syllables(&tokens);
        if total != HAIKU_SYLLABLES {
            trace!(total, "rejected on syllable total");
            return Err(Rejection::WrongTotal { total });
        }

        self.stats.packed.fetch_add(1, Ordering::Relaxed);
        let haiku = pack::pack(&tokens)?;
        self.stats.accepted.fetch_add(1, Ordering::Relaxed);

        if self.debug {
            info!(target: "haiku_feed::extract", "{}", haiku.to_text().replace('\n', " / "));
        }
        Ok(haiku)
    }
}

impl Default for HaikuExtractor {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for HaikuExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HaikuExtractor")
            .field("debug", &self.debug)
            .field("stats", &self.stats)
            .finish()
    }
}
