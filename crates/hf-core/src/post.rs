use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-line syllable budgets of a haiku.
pub const HAIKU_LINE_SYLLABLES: [usize; 3] = [5, 7, 5];

/// Total syllables of a haiku.
pub const HAIKU_SYLLABLES: usize = 17;

/// A stored haiku post. Records are immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub uri: String,
    pub cid: String,
    pub indexed_at: DateTime<Utc>,
    pub post_text: String,
    pub haiku: String,
    #[serde(default = "default_line_counts")]
    pub syllable_line_counts: [usize; 3],
}

fn default_line_counts() -> [usize; 3] {
    HAIKU_LINE_SYLLABLES
}

impl PostRecord {
    pub fn new(
        uri: impl Into<String>,
        cid: impl Into<String>,
        indexed_at: DateTime<Utc>,
        source_text: &str,
        haiku: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            cid: cid.into(),
            indexed_at,
            post_text: source_text.to_lowercase(),
            haiku: haiku.into(),
            syllable_line_counts: HAIKU_LINE_SYLLABLES,
        }
    }

    pub fn haiku_lines(&self) -> Vec<&str> {
        self.haiku.split('\n').collect()
    }

    /// Structural check used when loading persisted records.
    pub fn is_well_formed(&self) -> bool {
        let lines = self.haiku_lines();
        !self.uri.is_empty()
            && self.syllable_line_counts == HAIKU_LINE_SYLLABLES
            && lines.len() == 3
            && lines.iter().all(|l| !l.trim().is_empty())
    }
}
