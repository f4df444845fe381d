//! Text and score helpers used across stages

use regex::Regex;
use std::sync::OnceLock;

fn quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""([^"]+)"|(?:^|\W)'([^']+)'(?:\W|$)"#).expect("valid regex")
    })
}

/// First single- or double-quoted substring in `text`.
///
/// Single quotes only count when they stand apart from words, so
/// apostrophes in "user's" or "don't" are not read as quotes.
pub fn first_quoted(text: &str) -> Option<String> {
    quoted_regex().captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Clamp a score into `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Arithmetic mean, or 0.0 for an empty sequence.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Up to `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
