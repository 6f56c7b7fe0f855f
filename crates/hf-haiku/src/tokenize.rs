//! Stage 2: split sanitized text into words and count their syllables.

use crate::syllables::SyllableCounter;

/// A whitespace-delimited word and its syllable count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub syllables: usize,
}

impl Token {
    pub fn new(word: impl Into<String>, syllables: usize) -> Self {
        Self { word: word.into(), syllables }
    }
}

/// Tokens in source order; runs of whitespace yield no empty tokens.
pub fn tokenize(sanitized: &str, counter: &dyn SyllableCounter) -> Vec<Token> {
    sanitized
        .split_whitespace()
        .map(|word| Token::new(word, counter.count(word)))
        .collect()
}

pub fn total_syllables(tokens: &[Token]) -> usize {
    tokens.iter().map(|t| t.syllables).sum()
}
