//! Stage 3: greedy 5-7-5 line packing.
//!
//! Tokens are placed left to right into the first line that still has room.
//! There is no backtracking: a stream that sums to 17 but cannot be split at
//! the greedy boundaries is rejected.

use crate::tokenize::Token;
use hf_core::HAIKU_LINE_SYLLABLES;
use std::fmt;
use thiserror::Error;

/// Why a token stream is not a haiku.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("total syllables {total}, expected 17")]
    WrongTotal { total: usize },
    #[error("word {word:?} overflows line {line}")]
    LineOverflow { line: usize, word: String },
    #[error("word {word:?} left over after all lines filled")]
    NoLineLeft { word: String },
    #[error("lines end at {counts:?}, expected [5, 7, 5]")]
    Underfilled { counts: [usize; 3] },
}

/// A three-line 5-7-5 poem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Haiku {
    lines: [String; 3],
}

impl Haiku {
    pub fn lines(&self) -> &[String; 3] {
        &self.lines
    }

    pub fn syllable_counts(&self) -> [usize; 3] {
        HAIKU_LINE_SYLLABLES
    }

    /// Lines joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Haiku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.lines[0], self.lines[1], self.lines[2])
    }
}

#[derive(Default)]
struct Line {
    words: Vec<String>,
    count: usize,
}

pub fn pack(tokens: &[Token]) -> Result<Haiku, Rejection> {
    let mut lines: [Line; 3] = Default::default();

    for token in tokens {
        let Some(idx) = (0..3).find(|&i| lines[i].count < HAIKU_LINE_SYLLABLES[i]) else {
            return Err(Rejection::NoLineLeft { word: token.word.clone() });
        };
        let line = &mut lines[idx];
        if line.count + token.syllables > HAIKU_LINE_SYLLABLES[idx] {
            return Err(Rejection::LineOverflow { line: idx + 1, word: token.word.clone() });
        }
        line.count += token.syllables;
        line.words.push(token.word.clone());
    }

    let counts = [lines[0].count, lines[1].count, lines[2].count];
    if counts != HAIKU_LINE_SYLLABLES {
        return Err(Rejection::Underfilled { counts });
    }

    Ok(Haiku {
        lines: lines.map(|l| l.words.join(" ").trim().to_string()),
    })
}
