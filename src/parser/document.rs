//! Spreadsheet and word-processor documents
//!
//! Binary containers are decoded by a caller-supplied [`DocumentReader`]. The
//! rows or text blocks it hands back go through the csv and plain-text rules.

use super::confidence::parsing_confidence;
use super::csv::ColumnMap;
use super::{plain_text, ParseMethod, ParseOutcome};
use crate::error::PipelineError;
use crate::input::InputFormat;
use crate::model::TestCase;

pub const EXCEL_PLACEHOLDER_ID: &str = "EXCEL_AUTO";
pub const EXCEL_PLACEHOLDER_TITLE: &str = "Excel Test Case";
pub const EXCEL_ERROR_ID: &str = "EXCEL_ERROR";
pub const EXCEL_ERROR_TITLE: &str = "Excel Parse Error";
pub const WORD_ERROR_ID: &str = "WORD_ERROR";
pub const WORD_ERROR_TITLE: &str = "Word Parse Error";

const ID_COLUMNS: &[&str] = &["test id", "test_id", "id"];
const TITLE_COLUMNS: &[&str] = &["test title", "title", "test name"];
const DESCRIPTION_COLUMNS: &[&str] = &["description", "desc", "summary"];
const STEP_COLUMNS: &[&str] = &["step", "action", "description"];
const EXPECTED_COLUMNS: &[&str] = &["expected", "result"];
const DATA_COLUMNS: &[&str] = &["data", "input"];

/// Content pulled out of a binary document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedDocument {
    /// First sheet of a spreadsheet: header names plus data rows
    Rows {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Paragraphs and flattened table rows in document order
    Blocks(Vec<String>),
}

impl ExtractedDocument {
    /// Flattens the document into text lines, joining row cells with ` | `.
    pub fn to_text(&self) -> String {
        match self {
            ExtractedDocument::Rows { headers, rows } => std::iter::once(headers)
                .chain(rows.iter())
                .map(|cells| {
                    cells
                        .iter()
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            ExtractedDocument::Blocks(blocks) => blocks
                .iter()
                .map(|b| b.trim())
                .filter(|b| !b.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Decodes spreadsheet and document containers.
///
/// Implementations wrap whatever library reads the binary format; this crate
/// only consumes the materialized rows or blocks.
pub trait DocumentReader: Send + Sync {
    fn read(&self, format: InputFormat, bytes: &[u8]) -> anyhow::Result<ExtractedDocument>;
}

pub fn parse_excel(bytes: &[u8], reader: Option<&dyn DocumentReader>) -> ParseOutcome {
    let document = match read(bytes, InputFormat::Excel, reader) {
        Ok(doc) => doc,
        Err(message) => {
            return ParseOutcome::failed(
                TestCase::new(EXCEL_ERROR_ID, EXCEL_ERROR_TITLE),
                ParseMethod::Excel,
                PipelineError::parse_failure("Excel", message),
            )
        }
    };

    match document {
        ExtractedDocument::Rows { headers, rows } => parse_rows(&headers, &rows),
        blocks @ ExtractedDocument::Blocks(_) => {
            plain_text::parse(&blocks.to_text()).with_method(ParseMethod::Excel)
        }
    }
}

pub fn parse_word(bytes: &[u8], reader: Option<&dyn DocumentReader>) -> ParseOutcome {
    match read(bytes, InputFormat::Word, reader) {
        Ok(document) => plain_text::parse(&document.to_text()).with_method(ParseMethod::Word),
        Err(message) => ParseOutcome::failed(
            TestCase::new(WORD_ERROR_ID, WORD_ERROR_TITLE),
            ParseMethod::Word,
            PipelineError::parse_failure("Word document", message),
        ),
    }
}

fn read(
    bytes: &[u8],
    format: InputFormat,
    reader: Option<&dyn DocumentReader>,
) -> Result<ExtractedDocument, String> {
    let reader = reader.ok_or_else(|| format!("no document reader configured for {}", format))?;
    reader.read(format, bytes).map_err(|e| format!("{:#}", e))
}

fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    keywords.iter().find_map(|k| {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(k))
    })
}

fn first_value(headers: &[String], rows: &[Vec<String>], keywords: &[&str]) -> Option<String> {
    let col = find_column(headers, keywords)?;
    rows.iter()
        .filter_map(|r| r.get(col))
        .map(|c| c.trim())
        .find(|c| !c.is_empty() && !matches!(c.to_lowercase().as_str(), "nan" | "none"))
        .map(str::to_string)
}

fn parse_rows(headers: &[String], rows: &[Vec<String>]) -> ParseOutcome {
    let Some(description) = find_column(headers, STEP_COLUMNS) else {
        return ParseOutcome::failed(
            TestCase::new(EXCEL_ERROR_ID, EXCEL_ERROR_TITLE),
            ParseMethod::Excel,
            PipelineError::parse_failure("Excel", "no step column found in sheet header"),
        );
    };

    // Unmatched optional columns point past the row so they read as empty
    let columns = ColumnMap {
        description,
        expected_result: find_column(headers, EXPECTED_COLUMNS).unwrap_or(usize::MAX),
        test_data: find_column(headers, DATA_COLUMNS).unwrap_or(usize::MAX),
    };

    let id = first_value(headers, rows, ID_COLUMNS)
        .unwrap_or_else(|| EXCEL_PLACEHOLDER_ID.to_string());
    let title = first_value(headers, rows, TITLE_COLUMNS)
        .unwrap_or_else(|| EXCEL_PLACEHOLDER_TITLE.to_string());

    let mut test_case = TestCase::new(id, title);
    // The step column often doubles as "description"; only a distinct column counts
    test_case.description = find_column(headers, DESCRIPTION_COLUMNS)
        .filter(|&c| c != description)
        .and_then(|_| first_value(headers, rows, DESCRIPTION_COLUMNS))
        .unwrap_or_default();

    for row in rows {
        if let Some(step) = columns.step_from_row(row) {
            test_case.push_step(step);
        }
    }

    let raw = ExtractedDocument::Rows {
        headers: headers.to_vec(),
        rows: rows.to_vec(),
    }
    .to_text();
    let confidence = parsing_confidence(&test_case, &raw);
    ParseOutcome::new(test_case, confidence, ParseMethod::Excel)
}
