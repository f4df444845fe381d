//! Line-oriented parser for freeform test cases
//!
//! Identifier and title use first-match-wins label chains. Steps are segmented
//! line by line: a step-like line opens a step, expected-result and test-data
//! lines attach to the open step, anything else continues its description.

use super::confidence::parsing_confidence;
use super::text::{infer_action, parse_test_data};
use super::{ParseMethod, ParseOutcome};
use crate::model::{Step, TestCase};
use regex::Regex;
use std::sync::OnceLock;

pub const PLACEHOLDER_ID: &str = "AUTO_GENERATED";
pub const PLACEHOLDER_TITLE: &str = "Untitled Test Case";

const TITLE_KEYWORDS: &[&str] = &["test case", "title", "test:"];
const TITLE_SCAN_LINES: usize = 5;
const SEPARATORS: &[char] = &[':', '-', '|'];

const DESCRIPTION_KEYWORDS: &[&str] = &["description:", "desc:", "summary:"];
const DESCRIPTION_STOP_WORDS: &[&str] = &["step", "test", "action"];

const STEP_KEYWORDS: &[&str] = &[
    "step", "action", "click", "enter", "navigate", "verify", "check", "select", "fill",
];
const EXPECTED_KEYWORDS: &[&str] = &["expected", "result", "should", "verify", "assert"];
const EXPECTED_LABELS: &[&str] = &["expected:", "result:", "should:", "verify:", "assert:"];
const DATA_KEYWORDS: &[&str] = &["data:", "input:", "username:", "password:", "value:", "text:"];
const DATA_LABELS: &[&str] = &["test data:", "data:", "input:"];
const STEP_PREFIXES: &[&str] = &["step:", "action:", "given ", "when ", "then ", "and "];

struct Patterns {
    ids: Vec<Regex>,
    numbered: Regex,
    gherkin_token: Regex,
    step_label: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // Order matters: first match wins
        ids: [
            r"(?i)test\s*id\s*:?\s*([^\n\r]+)",
            r"(?i)\btc\s*-?\s*(\d+)",
            r"(?i)test\s*case\s*:?\s*([^\n\r]+)",
            r"(?i)\bid\b\s*:?\s*([^\n\r]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect(),
        numbered: Regex::new(r"^\d+[.)]\s+").expect("valid regex"),
        gherkin_token: Regex::new(r"(?i)^(given|when|then|and)\s+").expect("valid regex"),
        step_label: Regex::new(r"(?i)^step\s*\d+\s*[:.)\-]?\s*").expect("valid regex"),
    })
}

pub fn parse(raw: &str) -> ParseOutcome {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut test_case = TestCase::new(extract_id(raw), extract_title(&lines));
    test_case.description = extract_description(&lines);
    for step in segment_steps(&lines) {
        test_case.push_step(step);
    }

    let confidence = parsing_confidence(&test_case, raw);
    ParseOutcome::new(test_case, confidence, ParseMethod::PlainText)
}

fn extract_id(raw: &str) -> String {
    patterns()
        .ids
        .iter()
        .find_map(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_ID.to_string())
}

fn after_separator(line: &str) -> Option<&str> {
    SEPARATORS
        .iter()
        .find_map(|sep| line.split_once(*sep))
        .map(|(_, rest)| rest.trim())
}

fn extract_title(lines: &[&str]) -> String {
    for line in lines.iter().take(TITLE_SCAN_LINES) {
        let lower = line.to_lowercase();
        if TITLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return after_separator(line).unwrap_or(line).to_string();
        }
    }

    lines
        .first()
        .map(|l| l.to_string())
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

fn extract_description(lines: &[&str]) -> String {
    let mut collected: Vec<&str> = Vec::new();
    let mut in_description = false;

    for line in lines {
        let lower = line.to_lowercase();
        let is_stop =
            DESCRIPTION_STOP_WORDS.iter().any(|k| lower.contains(k)) || is_step_line(line);

        if DESCRIPTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            in_description = true;
            if let Some(rest) = after_separator(line).filter(|r| !r.is_empty()) {
                collected.push(rest);
            }
        } else if in_description {
            if is_stop {
                break;
            }
            collected.push(line);
        }
    }

    collected.join(" ").trim().to_string()
}

fn is_step_line(line: &str) -> bool {
    let p = patterns();
    if p.numbered.is_match(line) || p.gherkin_token.is_match(line) {
        return true;
    }
    let lower = line.to_lowercase();
    STEP_KEYWORDS.iter().any(|k| lower.starts_with(k))
}

fn is_expected_line(lower: &str) -> bool {
    EXPECTED_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn is_data_line(lower: &str) -> bool {
    DATA_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn strip_label<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let lower = line.to_lowercase();
    labels.iter().find_map(|label| {
        lower
            .find(label)
            .and_then(|idx| line.get(idx + label.len()..))
            .map(str::trim)
    })
}

fn clean_step_text(line: &str) -> String {
    let p = patterns();
    let mut cleaned = p.numbered.replace(line, "").to_string();
    cleaned = p.step_label.replace(&cleaned, "").to_string();

    let lower = cleaned.to_lowercase();
    if let Some(prefix) = STEP_PREFIXES.iter().find(|pre| lower.starts_with(*pre)) {
        cleaned = cleaned.get(prefix.len()..).unwrap_or_default().to_string();
    }
    cleaned.trim().to_string()
}

fn segment_steps(lines: &[&str]) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut current: Option<Step> = None;

    for line in lines {
        let lower = line.to_lowercase();

        if is_step_line(line) {
            if let Some(done) = current.take() {
                steps.push(done);
            }
            let description = clean_step_text(line);
            let action = infer_action(&description);
            current = Some(Step::new(steps.len() + 1, action, description));
            continue;
        }

        let Some(step) = current.as_mut() else {
            continue;
        };

        if is_expected_line(&lower) {
            let expected = strip_label(line, EXPECTED_LABELS).unwrap_or(line);
            step.expected_result = Some(expected.to_string());
        } else if is_data_line(&lower) {
            let payload = strip_label(line, DATA_LABELS).unwrap_or(line);
            step.test_data.extend(parse_test_data(payload));
        } else {
            if !step.description.is_empty() {
                step.description.push(' ');
            }
            step.description.push_str(line);
        }
    }

    if let Some(done) = current {
        steps.push(done);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionKind;
    use serde_json::json;

    #[test]
    fn test_salesforce_login_steps() {
        let raw = "Step 1: Navigate to https://login.salesforce.com\n\
                   Step 2: Enter username test@x.com\n\
                   Step 3: Click Login button";
        let outcome = parse(raw);
        let steps = &outcome.test_case.steps;

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].description, "Navigate to https://login.salesforce.com");
        assert_eq!(steps[0].action, ActionKind::Navigate);
        assert_eq!(steps[1].action, ActionKind::Input);
        assert_eq!(steps[2].action, ActionKind::Click);
        assert_eq!(outcome.test_case.id, PLACEHOLDER_ID);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_metadata_extraction() {
        let raw = "Test ID: TC-1001\n\
                   Title: Create opportunity\n\
                   Description: Sales rep creates a deal\n\
                   from the home page\n\
                   1. Open the Opportunities tab\n\
                   2. Click New\n\
                   Expected: Form opens\n\
                   3. Fill the amount field\n\
                   Data: amount=50000, stage=Prospecting";
        let outcome = parse(raw);
        let tc = &outcome.test_case;

        assert_eq!(tc.id, "TC-1001");
        assert_eq!(tc.title, "Create opportunity");
        assert_eq!(tc.description, "Sales rep creates a deal from the home page");
        assert_eq!(tc.steps.len(), 3);
        assert_eq!(tc.steps[1].expected_result.as_deref(), Some("Form opens"));
        assert_eq!(tc.steps[2].test_data.get("amount"), Some(&json!("50000")));
        assert_eq!(tc.steps[2].test_data.get("stage"), Some(&json!("Prospecting")));
        assert!(outcome.confidence > 0.9);
    }

    #[test]
    fn test_identifier_chain_order() {
        assert_eq!(extract_id("see TC-42 for details\nid: other"), "42");
        assert_eq!(extract_id("Test Case: Login works"), "Login works");
        assert_eq!(extract_id("ID: ABC-1"), "ABC-1");
        assert_eq!(extract_id("Provide valid credentials"), PLACEHOLDER_ID);
    }

    #[test]
    fn test_continuation_lines_join_description() {
        let raw = "1. Open the dashboard\nand wait for widgets\n2. Log out";
        let outcome = parse(raw);
        let steps = &outcome.test_case.steps;

        // "and wait ..." is a step-opening token
        assert_eq!(steps.len(), 3);

        let raw = "1. Open the dashboard\nthe widgets load lazily\n2. Log out";
        let steps = parse(raw).test_case.steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].description, "Open the dashboard the widgets load lazily");
    }

    #[test]
    fn test_lines_before_first_step_are_ignored() {
        let raw = "Some preamble text\n1) Open app";
        let outcome = parse(raw);
        assert_eq!(outcome.test_case.steps.len(), 1);
        assert_eq!(outcome.test_case.title, "Some preamble text");
    }

    #[test]
    fn test_empty_input() {
        let outcome = parse("   \n\t\n");
        assert!(outcome.test_case.steps.is_empty());
        assert_eq!(outcome.test_case.title, PLACEHOLDER_TITLE);
        assert!(outcome.confidence <= 0.1);
    }
}
