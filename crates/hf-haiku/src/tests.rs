use crate::*;
use crate::sanitize::{blank_digits, name_emoji, strip_hashtags, strip_mentions, strip_urls};
use crate::tokenize::total_syllables;
use std::sync::Arc;

fn letters() -> DictionaryCounter {
    DictionaryCounter::strict().with_words([
        ("a", 2), ("b", 3), ("c", 3), ("d", 4), ("e", 3), ("f", 2),
    ])
}

fn toks(spec: &[(&str, usize)]) -> Vec<Token> {
    spec.iter().map(|(w, n)| Token::new(*w, *n)).collect()
}

// ========== Sanitize ==========

#[test]
fn test_sanitize_strips_noise() {
    assert_eq!(sanitize("#tag @user https://x.co hello 1 2 3"), "hello");
}

#[test]
fn test_sanitize_digits_become_spaces() {
    assert_eq!(blank_digits("route66west"), "route  west");
    assert_eq!(sanitize("a1b"), "a b");
}

#[test]
fn test_blank_digits_only_decimal() {
    assert_eq!(blank_digits("½ Ⅻ ²"), "½ Ⅻ ²");
    assert_eq!(blank_digits("\u{0663}x"), " x");
}

#[test]
fn test_sanitize_names_emoji() {
    let words = |s: &str| sanitize(s).split_whitespace().map(String::from).collect::<Vec<_>>();
    assert_eq!(words("a 🐸 jumps"), vec!["a", "frog", "jumps"]);
    assert_eq!(words("☀️ rises"), vec!["sun", "rises"]);
    assert_eq!(sanitize("🐸🐸"), "frog  frog");
    assert_eq!(name_emoji("🌊"), " water wave ");
    assert_eq!(name_emoji("no emoji here"), "no emoji here");
}

#[test]
fn test_emoji_names_count_syllables() {
    let tokens = tokenize(&sanitize("old pond 🐸"), &EnglishSyllableCounter::new());
    assert_eq!(total_syllables(&tokens), 3);
}

#[test]
fn test_sanitize_noise_only() {
    assert_eq!(sanitize("#one #two @three http://four.example/5"), "");
    assert_eq!(sanitize("   "), "");
}

#[test]
fn test_sanitize_individual_passes() {
    assert_eq!(strip_hashtags("hi #rust there"), "hi  there");
    assert_eq!(strip_mentions("hi @bob.bsky.social"), "hi ");
    assert_eq!(strip_urls("see https://example.com/a?b=c now"), "see  now");
    assert_eq!(strip_urls("plain http:// text"), "plain http:// text");
}

#[test]
fn test_sanitize_keeps_words_and_punctuation() {
    assert_eq!(sanitize("  Autumn moonlight!  "), "Autumn moonlight!");
}

// ========== Syllables ==========

#[test]
fn test_english_counter_basic() {
    let c = EnglishSyllableCounter::new();
    assert_eq!(c.count("pond"), 1);
    assert_eq!(c.count("silent"), 2);
    assert_eq!(c.count("stone"), 1);
    assert_eq!(c.count("table"), 2);
    assert_eq!(c.count("jumped"), 1);
    assert_eq!(c.count("wanted"), 2);
    assert_eq!(c.count("yes"), 1);
    assert_eq!(c.count("day"), 1);
    assert_eq!(c.count("haiku"), 2);
}

#[test]
fn test_english_counter_punctuation_and_case() {
    let c = EnglishSyllableCounter::new();
    assert_eq!(c.count("..."), 0);
    assert_eq!(c.count("—"), 0);
    assert_eq!(c.count("Splash!"), 1);
    assert_eq!(c.count("SILENCE"), 2);
}

#[test]
fn test_dictionary_counter_fallback() {
    let c = DictionaryCounter::new(EnglishSyllableCounter::new()).with_word("Fire", 2);
    assert_eq!(c.count("fire"), 2);
    assert_eq!(c.count("pond"), 1);
    assert_eq!(DictionaryCounter::strict().count("pond"), 0);
}

#[test]
fn test_closure_counter() {
    let c = |w: &str| w.len();
    assert_eq!(SyllableCounter::count(&c, "abc"), 3);
}

struct Flaky;

impl FallibleSyllableCounter for Flaky {
    fn try_count(&self, word: &str) -> anyhow::Result<usize> {
        if word == "boom" {
            anyhow::bail!("backend unavailable")
        }
        Ok(1)
    }
}

#[test]
fn test_lenient_coerces_failures_to_zero() {
    let c = Lenient(Flaky);
    assert_eq!(c.count("boom"), 0);
    assert_eq!(c.count("word"), 1);
}

// ========== Tokenize ==========

#[test]
fn test_tokenize_order_and_counts() {
    let t = tokenize("a  b\tc", &letters());
    assert_eq!(t, toks(&[("a", 2), ("b", 3), ("c", 3)]));
    assert_eq!(total_syllables(&t), 8);
}

#[test]
fn test_tokenize_empty() {
    assert!(tokenize("", &letters()).is_empty());
    assert!(tokenize("   ", &letters()).is_empty());
}

// ========== Pack ==========

#[test]
fn test_pack_exact_fill() {
    let h = pack(&toks(&[("a", 2), ("b", 3), ("c", 3), ("d", 4), ("e", 3), ("f", 2)])).unwrap();
    assert_eq!(h.to_text(), "a b\nc d\ne f");
    assert_eq!(h.to_string(), "a b\nc d\ne f");
    assert_eq!(h.syllable_counts(), [5, 7, 5]);
}

#[test]
fn test_pack_greedy_rejection_on_overflow() {
    let r = pack(&toks(&[("a", 5), ("b", 8), ("c", 4)])).unwrap_err();
    assert_eq!(r, Rejection::LineOverflow { line: 2, word: "b".into() });
}

#[test]
fn test_pack_no_backtracking() {
    // Sums to 17, but the first line cannot hold both threes.
    let r = pack(&toks(&[("a", 3), ("b", 3), ("c", 4), ("d", 3), ("e", 4)])).unwrap_err();
    assert_eq!(r, Rejection::LineOverflow { line: 1, word: "b".into() });
}

#[test]
fn test_pack_underfilled_third_line() {
    let r = pack(&toks(&[("a", 5), ("b", 7), ("c", 2)])).unwrap_err();
    assert_eq!(r, Rejection::Underfilled { counts: [5, 7, 2] });
}

#[test]
fn test_pack_empty_input() {
    assert_eq!(pack(&[]).unwrap_err(), Rejection::Underfilled { counts: [0, 0, 0] });
}

#[test]
fn test_pack_leftover_token() {
    let r = pack(&toks(&[("a", 5), ("b", 7), ("c", 5), ("!", 0)])).unwrap_err();
    assert_eq!(r, Rejection::NoLineLeft { word: "!".into() });
}

#[test]
fn test_pack_zero_syllable_token_joins_open_line() {
    let h = pack(&toks(&[("a", 5), ("—", 0), ("b", 7), ("c", 5)])).unwrap();
    assert_eq!(h.lines()[0], "a");
    assert_eq!(h.lines()[1], "— b");
}

// ========== Extractor ==========

#[test]
fn test_extract_scenario() {
    let ex = HaikuExtractor::new(Arc::new(letters()));
    let h = ex.extract("a b c d e f").unwrap();
    assert_eq!(h.to_text(), "a b\nc d\ne f");
}

#[test]
fn test_extract_english_haiku() {
    let ex = HaikuExtractor::english();
    let text = "An old silent pond a frog jumps into the pond splash! Silence again. #haiku @basho";
    let h = ex.extract(text).unwrap();
    assert_eq!(h.lines()[0], "An old silent pond");
    assert_eq!(h.lines()[1], "a frog jumps into the pond");
    assert_eq!(h.lines()[2], "splash! Silence again.");
}

#[test]
fn test_extract_wrong_total_skips_packer() {
    let ex = HaikuExtractor::new(Arc::new(letters()));
    assert_eq!(ex.try_extract("a b c").unwrap_err(), Rejection::WrongTotal { total: 8 });
    assert_eq!(ex.try_extract("").unwrap_err(), Rejection::WrongTotal { total: 0 });
    assert_eq!(ex.stats().extracted(), 2);
    assert_eq!(ex.stats().packed(), 0);
}

#[test]
fn test_extract_total_17_but_greedy_rejects() {
    let counter = DictionaryCounter::strict().with_words([("x", 5), ("y", 8), ("z", 4)]);
    let ex = HaikuExtractor::new(Arc::new(counter));
    assert!(ex.extract("x y z").is_none());
    assert_eq!(ex.stats().packed(), 1);
    assert_eq!(ex.stats().accepted(), 0);
}

#[test]
fn test_extract_deterministic() {
    let ex = HaikuExtractor::english().with_debug(true);
    let text = "An old silent pond a frog jumps into the pond splash! Silence again.";
    let first = ex.extract(text);
    for _ in 0..5 {
        assert_eq!(ex.extract(text), first);
    }
}

#[test]
fn test_extract_exactness_over_inputs() {
    let ex = HaikuExtractor::english();
    let counter = EnglishSyllableCounter::new();
    let texts = [
        "An old silent pond a frog jumps into the pond splash! Silence again.",
        "hello world",
        "the light of a candle is transferred to another candle spring twilight",
        "",
    ];
    for t in texts {
        if let Some(h) = ex.extract(t) {
            let sums: Vec<usize> = h
                .lines()
                .iter()
                .map(|l| l.split_whitespace().map(|w| counter.count(w)).sum())
                .collect();
            assert_eq!(sums, vec![5, 7, 5]);
        }
    }
}

#[test]
fn test_extract_digits_split_words() {
    let counter = DictionaryCounter::strict().with_words([("five", 5), ("seven", 7)]);
    let ex = HaikuExtractor::new(Arc::new(counter));
    let h = ex.extract("five7seven 42 five").unwrap();
    assert_eq!(h.to_text(), "five\nseven\nfive");
}
