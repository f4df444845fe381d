//! Structural parsing: raw payload to [`TestCase`]
//!
//! Each format has its own rules but all of them return a [`ParseOutcome`]
//! scored with the same confidence formula. Parsing never fails outright:
//! malformed input yields a zero-confidence placeholder and an error message.

pub mod confidence;
pub mod csv;
pub mod document;
pub mod gherkin;
pub mod json;
pub mod plain_text;
pub mod text;

pub use confidence::parsing_confidence;
pub use document::{DocumentReader, ExtractedDocument};

use crate::error::PipelineError;
use crate::input::{InputFormat, RawInput};
use crate::model::TestCase;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMethod {
    #[serde(rename = "plain_text_parser")]
    PlainText,
    #[serde(rename = "gherkin_parser")]
    Gherkin,
    #[serde(rename = "json_parser")]
    Json,
    #[serde(rename = "csv_parser")]
    Csv,
    #[serde(rename = "excel_parser")]
    Excel,
    #[serde(rename = "word_parser")]
    Word,
}

impl ParseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMethod::PlainText => "plain_text_parser",
            ParseMethod::Gherkin => "gherkin_parser",
            ParseMethod::Json => "json_parser",
            ParseMethod::Csv => "csv_parser",
            ParseMethod::Excel => "excel_parser",
            ParseMethod::Word => "word_parser",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub test_case: TestCase,
    pub confidence: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub method: ParseMethod,
}

impl ParseOutcome {
    pub fn new(test_case: TestCase, confidence: f64, method: ParseMethod) -> Self {
        Self {
            test_case,
            confidence,
            errors: Vec::new(),
            warnings: Vec::new(),
            method,
        }
    }

    /// Zero-confidence outcome around a placeholder test case.
    pub fn failed(placeholder: TestCase, method: ParseMethod, error: PipelineError) -> Self {
        debug!(kind = error.kind(), method = method.as_str(), error = %error, "parse failed");
        Self {
            test_case: placeholder,
            confidence: 0.0,
            errors: vec![error.to_string()],
            warnings: Vec::new(),
            method,
        }
    }

    pub fn with_method(mut self, method: ParseMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        !self.errors.is_empty() && self.confidence == 0.0
    }
}

/// Parses `input` with the rules for `format`.
///
/// Formats without a dedicated parser (pdf, binary, unknown) are decoded
/// lossily and read as plain text, with a warning.
pub fn parse(
    input: &RawInput,
    format: InputFormat,
    reader: Option<&dyn DocumentReader>,
) -> ParseOutcome {
    let outcome = match format {
        InputFormat::Json => json::parse(&input.as_text_lossy()),
        InputFormat::Gherkin => gherkin::parse(&input.as_text_lossy()),
        InputFormat::Csv => csv::parse(&input.as_text_lossy()),
        InputFormat::PlainText => plain_text::parse(&input.as_text_lossy()),
        InputFormat::Excel => document::parse_excel(input.as_bytes(), reader),
        InputFormat::Word => document::parse_word(input.as_bytes(), reader),
        InputFormat::Pdf | InputFormat::Binary | InputFormat::Unknown => {
            let warning = PipelineError::FormatDetectionAmbiguous(format!(
                "no parser for '{}' input",
                format
            ));
            warn!(
                kind = warning.kind(),
                format = %format,
                "falling back to plain text parsing"
            );
            plain_text::parse(&input.as_text_lossy()).with_warning(warning.to_string())
        }
    };

    debug!(
        format = %format,
        method = outcome.method.as_str(),
        steps = outcome.test_case.steps.len(),
        confidence = outcome.confidence,
        "parsed test case"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_formats_fall_back_with_warning() {
        let input = RawInput::Bytes(b"%PDF-1.4\n1. Open the report".to_vec());
        let outcome = parse(&input, InputFormat::Pdf, None);

        assert_eq!(outcome.method, ParseMethod::PlainText);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("pdf"));
        assert_eq!(outcome.test_case.steps.len(), 1);
    }

    #[test]
    fn test_declared_json_that_is_broken() {
        let outcome = parse(&RawInput::from("{ bad json"), InputFormat::Json, None);
        assert!(outcome.is_failure());
        assert_eq!(outcome.test_case.id, json::ERROR_ID);
    }

    #[test]
    fn test_method_serializes_as_tag() {
        assert_eq!(
            serde_json::to_value(ParseMethod::Word).unwrap(),
            serde_json::json!("word_parser")
        );
    }
}
