//! Structured JSON test cases
//!
//! Accepts a test-case object (optionally wrapped in `test_case`) or a bare
//! array of steps. Step fields accept aliases: `description`/`step`,
//! `expected`/`expected_result`, `data`/`test_data`.

use super::confidence::parsing_confidence;
use super::text::{infer_action, json_to_test_data, value_text};
use super::{ParseMethod, ParseOutcome};
use crate::error::PipelineError;
use crate::model::{ActionKind, Step, TestCase};
use serde_json::{Map, Value};

pub const PLACEHOLDER_ID: &str = "JSON_AUTO";
pub const PLACEHOLDER_TITLE: &str = "JSON Test Case";
pub const ERROR_ID: &str = "ERROR";
pub const ERROR_TITLE: &str = "JSON Parse Error";
const LIST_DESCRIPTION: &str = "Imported from JSON";

pub fn parse(raw: &str) -> ParseOutcome {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(v) => v,
        Err(e) => return failure(e.to_string()),
    };

    let test_case = match value {
        Value::Object(mut obj) => match obj.remove("test_case") {
            Some(Value::Object(inner)) => from_object(&inner),
            Some(_) => return failure("'test_case' must be an object".to_string()),
            None => from_object(&obj),
        },
        Value::Array(items) => {
            let mut tc = TestCase::new(PLACEHOLDER_ID, PLACEHOLDER_TITLE);
            tc.description = LIST_DESCRIPTION.to_string();
            push_steps(&mut tc, &items);
            tc
        }
        other => {
            return failure(format!(
                "expected an object or an array, found {}",
                json_kind(&other)
            ))
        }
    };

    let confidence = parsing_confidence(&test_case, raw);
    ParseOutcome::new(test_case, confidence, ParseMethod::Json)
}

fn failure(message: String) -> ParseOutcome {
    let error = PipelineError::parse_failure("JSON", message);
    ParseOutcome::failed(TestCase::new(ERROR_ID, ERROR_TITLE), ParseMethod::Json, error)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// First non-empty textual value among `keys`.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .map(value_text)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn from_object(obj: &Map<String, Value>) -> TestCase {
    let id = text_field(obj, &["test_id", "id"]).unwrap_or_else(|| PLACEHOLDER_ID.to_string());
    let title =
        text_field(obj, &["title", "name"]).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());

    let mut tc = TestCase::new(id, title);
    tc.description = text_field(obj, &["description"]).unwrap_or_default();
    if let Some(Value::Array(items)) = obj.get("steps") {
        push_steps(&mut tc, items);
    }
    tc
}

fn push_steps(tc: &mut TestCase, items: &[Value]) {
    for item in items {
        match item {
            Value::Object(step) => tc.push_step(step_from_object(step)),
            Value::String(text) if !text.trim().is_empty() => {
                tc.push_step(Step::new(0, infer_action(text), text.trim()))
            }
            _ => {}
        }
    }
}

fn step_from_object(obj: &Map<String, Value>) -> Step {
    let description = text_field(obj, &["description", "step"]).unwrap_or_default();
    let action = text_field(obj, &["action"])
        .and_then(|label| ActionKind::from_label(&label))
        .unwrap_or_else(|| infer_action(&description));

    let mut step = Step::new(0, action, description);
    step.expected_result = text_field(obj, &["expected", "expected_result"]);
    step.test_data = ["data", "test_data"]
        .iter()
        .find_map(|k| obj.get(*k))
        .cloned()
        .map(json_to_test_data)
        .unwrap_or_default();
    step.gherkin_keyword = text_field(obj, &["gherkin_keyword"]);
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_object_round_trips() {
        let raw = json!({
            "test_id": "TC-9",
            "title": "Reset password",
            "description": "User resets a forgotten password",
            "steps": [
                {"step_number": 1, "action": "navigate", "description": "Open https://app.example.com/reset",
                 "expected_result": "Reset form shown", "test_data": {"url": "https://app.example.com/reset"}},
                {"step_number": 2, "action": "input", "description": "Enter the account email",
                 "expected_result": "Email accepted", "test_data": {"email": "a@b.co"}}
            ]
        })
        .to_string();

        let outcome = parse(&raw);
        let tc = &outcome.test_case;

        assert!(outcome.errors.is_empty());
        assert_eq!(tc.id, "TC-9");
        assert_eq!(tc.title, "Reset password");
        assert_eq!(tc.steps[1].action, ActionKind::Input);
        assert_eq!(tc.steps[1].test_data.get("email"), Some(&json!("a@b.co")));
        assert!(outcome.confidence >= 0.9);
    }

    #[test]
    fn test_wrapped_object_and_aliases() {
        let raw = r#"{"test_case": {"id": "W-1", "steps": [
            {"step": "Click Save", "expected": "Saved", "data": "record=42"}
        ]}}"#;
        let outcome = parse(raw);
        let step = &outcome.test_case.steps[0];

        assert_eq!(outcome.test_case.id, "W-1");
        assert_eq!(outcome.test_case.title, PLACEHOLDER_TITLE);
        assert_eq!(step.description, "Click Save");
        assert_eq!(step.action, ActionKind::Click);
        assert_eq!(step.expected_result.as_deref(), Some("Saved"));
        assert_eq!(step.test_data.get("record"), Some(&json!("42")));
    }

    #[test]
    fn test_bare_list_of_steps() {
        let outcome = parse(r#"[{"description": "Open app"}, "Click login", 7]"#);
        let tc = &outcome.test_case;

        assert_eq!(tc.id, PLACEHOLDER_ID);
        assert_eq!(tc.description, LIST_DESCRIPTION);
        assert_eq!(tc.steps.len(), 2);
        assert_eq!(tc.steps[1].step_number, 2);
    }

    #[test]
    fn test_malformed_json() {
        let outcome = parse("{ bad json");
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.test_case.id, ERROR_ID);
        assert_eq!(outcome.test_case.title, ERROR_TITLE);
        assert!(outcome.errors[0].starts_with("JSON parsing failed"));
    }

    #[test]
    fn test_scalar_json_is_a_failure() {
        let outcome = parse("\"just a string\"");
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.errors[0].contains("found a string"));
    }
}
