//! Stage 1: strip structural noise from post text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\S+").unwrap());
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").unwrap());
static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static RE_EMOJI: LazyLock<Regex> = LazyLock::new(|| Regex::new(
    "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\
     \u{1F1E0}-\u{1F1FF}\u{2702}-\u{27B0}\u{1F900}-\u{1F9FF}\
     \u{1FA00}-\u{1FA6F}\u{1FA70}-\u{1FAFF}\u{2600}-\u{26FF}]\u{FE0F}?"
).unwrap());
static RE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

pub fn strip_hashtags(text: &str) -> String {
    RE_HASHTAG.replace_all(text, "").into_owned()
}

pub fn strip_mentions(text: &str) -> String {
    RE_MENTION.replace_all(text, "").into_owned()
}

pub fn strip_urls(text: &str) -> String {
    RE_URL.replace_all(text, "").into_owned()
}

/// Replace each emoji with its name, padded with spaces so the name's words
/// count toward the syllable total. Unknown emoji are left as they are.
pub fn name_emoji(text: &str) -> String {
    RE_EMOJI
        .replace_all(text, |caps: &Captures| match emojis::get(&caps[0]) {
            Some(emoji) => format!(" {} ", emoji.name().replace('_', " ")),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Each decimal digit becomes one space, so `"a1b"` stays two words.
pub fn blank_digits(text: &str) -> String {
    RE_DIGIT.replace_all(text, " ").into_owned()
}

/// Remove hashtags, mentions and URLs, name emoji, blank digits, then trim.
pub fn sanitize(text: &str) -> String {
    let mut result = strip_hashtags(text);
    result = strip_mentions(&result);
    result = strip_urls(&result);
    result = name_emoji(&result);
    result = blank_digits(&result);
    result.trim().to_string()
}
