//! Format classification for raw test-case payloads
//!
//! Binary payloads are sniffed by container signature. Text payloads go
//! through a fixed precedence: json, gherkin, csv, then plain text, which
//! always matches.

use super::RawInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK";
const PDF_MAGIC: &[u8] = b"%PDF";
const SPREADSHEET_MARKER: &[u8] = b"xl/";
const DOCUMENT_MARKER: &[u8] = b"word/";

const GHERKIN_HEADERS: &[&str] = &["feature:", "scenario:", "scenario outline:", "background:"];
const GHERKIN_STEP_WORDS: &[&str] = &["given ", "when ", "then "];

/// Number of leading non-empty lines inspected for the csv heuristic
const CSV_SAMPLE_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Json,
    Gherkin,
    Csv,
    PlainText,
    Excel,
    Word,
    Pdf,
    Binary,
    Unknown,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Json => "json",
            InputFormat::Gherkin => "gherkin",
            InputFormat::Csv => "csv",
            InputFormat::PlainText => "plain_text",
            InputFormat::Excel => "excel",
            InputFormat::Word => "word",
            InputFormat::Pdf => "pdf",
            InputFormat::Binary => "binary",
            InputFormat::Unknown => "unknown",
        }
    }

    /// Maps a caller-supplied format label. Unrecognized labels become `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "json" => InputFormat::Json,
            "gherkin" | "feature" | "bdd" => InputFormat::Gherkin,
            "csv" => InputFormat::Csv,
            "plain_text" | "text" | "txt" | "plain" => InputFormat::PlainText,
            "excel" | "xlsx" | "xls" => InputFormat::Excel,
            "word" | "docx" | "doc" => InputFormat::Word,
            "pdf" => InputFormat::Pdf,
            "binary" => InputFormat::Binary,
            _ => InputFormat::Unknown,
        }
    }

    /// Formats that have no parser of their own and are read as plain text
    pub fn falls_back_to_plain_text(&self) -> bool {
        matches!(
            self,
            InputFormat::Pdf | InputFormat::Binary | InputFormat::Unknown
        )
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels `input`. A hint, when present, always wins.
pub fn classify(input: &RawInput, hint: Option<InputFormat>) -> InputFormat {
    if let Some(hint) = hint {
        debug!(format = %hint, "using caller-supplied format");
        return hint;
    }

    let format = match input {
        RawInput::Text(text) => classify_text(text),
        RawInput::Bytes(bytes) => classify_bytes(bytes),
    };
    debug!(format = %format, bytes = input.len(), "classified input");
    format
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn classify_bytes(bytes: &[u8]) -> InputFormat {
    if bytes.starts_with(ZIP_MAGIC) {
        if contains_subslice(bytes, SPREADSHEET_MARKER) {
            return InputFormat::Excel;
        }
        if contains_subslice(bytes, DOCUMENT_MARKER) {
            return InputFormat::Word;
        }
        // A zip container we cannot attribute
        return InputFormat::Unknown;
    }

    if bytes.starts_with(PDF_MAGIC) {
        return InputFormat::Pdf;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => classify_text(text),
        Err(_) => InputFormat::Binary,
    }
}

fn classify_text(text: &str) -> InputFormat {
    let trimmed = text.trim();

    if looks_like_json(trimmed) {
        return InputFormat::Json;
    }
    if looks_like_gherkin(trimmed) {
        return InputFormat::Gherkin;
    }
    if looks_like_csv(trimmed) {
        return InputFormat::Csv;
    }
    InputFormat::PlainText
}

fn looks_like_json(trimmed: &str) -> bool {
    let delimited = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    delimited && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

fn looks_like_gherkin(trimmed: &str) -> bool {
    trimmed.lines().any(|line| {
        let line = line.trim_start().to_lowercase();
        GHERKIN_HEADERS.iter().any(|h| line.starts_with(h))
            || GHERKIN_STEP_WORDS.iter().any(|w| line.starts_with(w))
    })
}

fn looks_like_csv(trimmed: &str) -> bool {
    let counts: Vec<usize> = trimmed
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(CSV_SAMPLE_LINES)
        .map(|l| l.matches(',').count())
        .collect();

    if counts.len() < 2 || counts.iter().any(|&c| c == 0) {
        return false;
    }

    let mut distinct = counts.clone();
    distinct.sort_unstable();
    distinct.dedup();
    distinct.len() <= 2
}
