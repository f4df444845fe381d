//! Tabular test cases: csv text and spreadsheet rows share one row mapper

use super::confidence::parsing_confidence;
use super::text::{infer_action, parse_test_data};
use super::{ParseMethod, ParseOutcome};
use crate::error::PipelineError;
use crate::model::{Step, TestCase};
use csv::{ReaderBuilder, Trim};

pub const PLACEHOLDER_ID: &str = "CSV_AUTO";
pub const PLACEHOLDER_TITLE: &str = "CSV Test Case";
pub const EMPTY_ID: &str = "CSV_EMPTY";
pub const EMPTY_TITLE: &str = "Empty CSV";

const DESCRIPTION_HEADERS: &[&str] = &["step", "action", "description"];
const EXPECTED_HEADERS: &[&str] = &["expected", "result"];
const DATA_HEADERS: &[&str] = &["data", "input"];

/// Which columns feed a step. Positions 0/1/2 when no header keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub description: usize,
    pub expected_result: usize,
    pub test_data: usize,
}

impl ColumnMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut description = None;
        let mut expected_result = None;
        let mut test_data = None;

        for (i, header) in headers.iter().enumerate() {
            let h = header.as_ref().to_lowercase();
            if DESCRIPTION_HEADERS.iter().any(|k| h.contains(k)) {
                description.get_or_insert(i);
            } else if EXPECTED_HEADERS.iter().any(|k| h.contains(k)) {
                expected_result.get_or_insert(i);
            } else if DATA_HEADERS.iter().any(|k| h.contains(k)) {
                test_data.get_or_insert(i);
            }
        }

        Self {
            description: description.unwrap_or(0),
            expected_result: expected_result.unwrap_or(1),
            test_data: test_data.unwrap_or(2),
        }
    }

    /// Builds a step from one row, or `None` for a row with no description.
    pub fn step_from_row<S: AsRef<str>>(&self, row: &[S]) -> Option<Step> {
        let cell = |idx: usize| {
            row.get(idx)
                .map(|c| c.as_ref().trim())
                .filter(|c| !c.is_empty() && !is_null_marker(c))
        };

        let description = cell(self.description)?;
        let mut step = Step::new(0, infer_action(description), description);
        step.expected_result = cell(self.expected_result).map(str::to_string);
        step.test_data = cell(self.test_data).map(parse_test_data).unwrap_or_default();
        Some(step)
    }
}

fn is_null_marker(cell: &str) -> bool {
    matches!(cell.to_lowercase().as_str(), "nan" | "none")
}

pub fn parse(raw: &str) -> ParseOutcome {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.trim().as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let cells: Vec<String> = record.iter().map(str::to_string).collect();
                if cells.iter().any(|c| !c.is_empty()) {
                    records.push(cells);
                }
            }
            Err(e) => {
                return ParseOutcome::failed(
                    TestCase::new(PLACEHOLDER_ID, PLACEHOLDER_TITLE),
                    ParseMethod::Csv,
                    PipelineError::parse_failure("CSV", e.to_string()),
                )
            }
        }
    }

    let Some((headers, rows)) = records.split_first() else {
        return ParseOutcome::failed(
            TestCase::new(EMPTY_ID, EMPTY_TITLE),
            ParseMethod::Csv,
            PipelineError::parse_failure("CSV", "empty input"),
        );
    };

    let columns = ColumnMap::from_headers(headers);
    let mut test_case = TestCase::new(PLACEHOLDER_ID, PLACEHOLDER_TITLE);
    for row in rows {
        if let Some(step) = columns.step_from_row(row) {
            test_case.push_step(step);
        }
    }

    let confidence = parsing_confidence(&test_case, raw);
    ParseOutcome::new(test_case, confidence, ParseMethod::Csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionKind;
    use serde_json::json;

    #[test]
    fn test_header_keywords_map_columns() {
        let raw = "Expected Result,Step Description,Test Data\n\
                   Home page shown,Navigate to home,\n\
                   Logged in,Enter credentials,\"user=alice, pass=pw\"";
        let outcome = parse(raw);
        let steps = &outcome.test_case.steps;

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].description, "Navigate to home");
        assert_eq!(steps[0].action, ActionKind::Navigate);
        assert_eq!(steps[0].expected_result.as_deref(), Some("Home page shown"));
        assert!(steps[0].test_data.is_empty());
        assert_eq!(steps[1].test_data.get("user"), Some(&json!("alice")));
        assert_eq!(steps[1].test_data.get("pass"), Some(&json!("pw")));
    }

    #[test]
    fn test_positional_fallback() {
        let columns = ColumnMap::from_headers(&["a", "b", "c"]);
        assert_eq!(
            columns,
            ColumnMap {
                description: 0,
                expected_result: 1,
                test_data: 2
            }
        );

        let outcome = parse("col1,col2\nClick OK,Dialog closes\nWait 5 seconds");
        let steps = &outcome.test_case.steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].action, ActionKind::Wait);
        assert!(steps[1].expected_result.is_none());
    }

    #[test]
    fn test_empty_input() {
        let outcome = parse("   ");
        assert_eq!(outcome.test_case.id, EMPTY_ID);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_null_markers_skip_rows() {
        let outcome = parse("step,expected\nnan,x\nClick Go,done");
        assert_eq!(outcome.test_case.steps.len(), 1);
        assert_eq!(outcome.test_case.steps[0].step_number, 1);
    }
}
