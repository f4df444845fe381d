//! Helpers shared by the per-format parsers

use crate::model::{ActionKind, TestData};
use serde_json::Value;

const NAVIGATE_WORDS: &[&str] = &["navigate", "go to", "open", "visit"];
const CLICK_WORDS: &[&str] = &["click", "press", "tap"];
const INPUT_WORDS: &[&str] = &["enter", "type", "input", "fill"];
const SELECT_WORDS: &[&str] = &["select", "choose", "pick"];
const VERIFY_WORDS: &[&str] = &["verify", "check", "assert", "confirm"];
const WAIT_WORDS: &[&str] = &["wait", "pause", "delay"];

/// Infers the action kind of a step from its text. First family to match wins.
pub fn infer_action(text: &str) -> ActionKind {
    let lower = text.to_lowercase();
    let table: [(&[&str], ActionKind); 6] = [
        (NAVIGATE_WORDS, ActionKind::Navigate),
        (CLICK_WORDS, ActionKind::Click),
        (INPUT_WORDS, ActionKind::Input),
        (SELECT_WORDS, ActionKind::Select),
        (VERIFY_WORDS, ActionKind::Verify),
        (WAIT_WORDS, ActionKind::Wait),
    ];

    table
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ActionKind::Generic)
}

/// Parses free-form test data.
///
/// Tries JSON first, then `k=v` pairs, then `k:v` pairs, all comma separated.
/// Anything else becomes `{"value": s}`. Empty, `nan` and `none` yield no data.
pub fn parse_test_data(raw: &str) -> TestData {
    let trimmed = raw.trim();
    if trimmed.is_empty() || matches!(trimmed.to_lowercase().as_str(), "nan" | "none") {
        return TestData::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return json_to_test_data(value);
    }

    let mut data = TestData::new();
    if trimmed.contains('=') {
        collect_pairs(trimmed, '=', &mut data);
    } else if trimmed.contains(':') {
        collect_pairs(trimmed, ':', &mut data);
    } else {
        data.insert("value".to_string(), Value::String(trimmed.to_string()));
    }
    data
}

fn collect_pairs(raw: &str, separator: char, data: &mut TestData) {
    for pair in raw.split(',') {
        if let Some((key, value)) = pair.split_once(separator) {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            data.insert(key.to_string(), Value::String(value.trim().to_string()));
        }
    }
}

/// Converts an arbitrary JSON value into a test-data mapping.
pub fn json_to_test_data(value: Value) -> TestData {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        Value::Null => TestData::new(),
        Value::String(s) => parse_test_data(&s),
        other => {
            let mut data = TestData::new();
            data.insert("value".to_string(), other);
            data
        }
    }
}

/// Renders a test-data value for text matching, without JSON quoting for strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
