//! Haiku detection for post text.
//!
//! Stages:
//! 1. Sanitize: drop hashtags, mentions, URLs; blank out digits
//! 2. Tokenize: whitespace words with syllable counts
//! 3. Pack: greedy 5-7-5 line assignment

pub mod extractor;
pub mod pack;
pub mod sanitize;
pub mod syllables;
pub mod tokenize;

pub use extractor::{ExtractStats, HaikuExtractor};
pub use pack::{pack, Haiku, Rejection};
pub use sanitize::sanitize;
pub use syllables::{DictionaryCounter, EnglishSyllableCounter, FallibleSyllableCounter, Lenient, SyllableCounter};
pub use tokenize::{tokenize, Token};

#[cfg(test)]
mod tests;
