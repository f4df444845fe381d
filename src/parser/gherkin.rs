//! Gherkin feature files: one step per Given/When/Then/And/But line

use super::confidence::parsing_confidence;
use super::{ParseMethod, ParseOutcome};
use crate::model::{ActionKind, Step, TestCase};

pub const PLACEHOLDER_ID: &str = "GHERKIN_AUTO";
pub const PLACEHOLDER_TITLE: &str = "Gherkin Feature";

const KEYWORDS: &[(&str, ActionKind)] = &[
    ("given", ActionKind::Setup),
    ("when", ActionKind::Action),
    ("then", ActionKind::Verification),
    ("and", ActionKind::Continuation),
    ("but", ActionKind::Exception),
];

/// Splits `line` into (keyword, remainder) when it opens with a step keyword.
fn step_keyword(line: &str) -> Option<(&str, ActionKind, &str)> {
    let (head, rest) = line.split_once(char::is_whitespace)?;
    let head_lower = head.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == head_lower)
        .map(|(_, kind)| (head, *kind, rest.trim()))
}

fn header_value<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    let prefix = line.get(..header.len())?;
    if prefix.eq_ignore_ascii_case(header) {
        line.get(header.len()..).map(str::trim)
    } else {
        None
    }
}

pub fn parse(raw: &str) -> ParseOutcome {
    let mut test_case = TestCase::new(PLACEHOLDER_ID, PLACEHOLDER_TITLE);

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(title) = header_value(line, "feature:") {
            test_case.title = title.to_string();
        } else if let Some(scenario) = header_value(line, "scenario outline:")
            .or_else(|| header_value(line, "scenario:"))
        {
            test_case.description = scenario.to_string();
        } else if let Some((keyword, kind, text)) = step_keyword(line) {
            let mut step = Step::new(0, kind, text);
            step.gherkin_keyword = Some(keyword.to_string());
            test_case.push_step(step);
        }
    }

    let confidence = parsing_confidence(&test_case, raw);
    ParseOutcome::new(test_case, confidence, ParseMethod::Gherkin)
}
