//! Run input and the state threaded through the stages

use crate::input::{InputFormat, RawInput};
use crate::intent::IntentOutcome;
use crate::locator::ElementOutcome;
use crate::parser::ParseOutcome;
use crate::platform::PlatformOutcome;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Optional caller knowledge about the payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMetadata {
    /// Skips format classification when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<InputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInput {
    pub raw: RawInput,
    #[serde(default)]
    pub metadata: InputMetadata,
}

impl PipelineInput {
    pub fn new(raw: impl Into<RawInput>) -> Self {
        Self {
            raw: raw.into(),
            metadata: InputMetadata::default(),
        }
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.metadata.format = Some(format);
        self
    }

    pub fn with_platform_hint(mut self, hint: impl Into<String>) -> Self {
        self.metadata.platform_hint = Some(hint.into());
        self
    }
}

/// Result record owned by one run; each stage fills in its own slot
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub run_id: Uuid,
    pub input: PipelineInput,
    /// Lossy text view of the payload, scanned for platform evidence
    pub raw_text: String,
    pub format: Option<InputFormat>,
    pub parse: Option<ParseOutcome>,
    pub intent: Option<IntentOutcome>,
    pub platform: Option<PlatformOutcome>,
    pub elements: Option<ElementOutcome>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PipelineState {
    pub fn new(input: PipelineInput) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            raw_text: input.raw.as_text_lossy().into_owned(),
            input,
            format: None,
            parse: None,
            intent: None,
            platform: None,
            elements: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Compact view used for heuristic log entries
    pub fn summary(&self) -> Value {
        json!({
            "run_id": self.run_id.to_string(),
            "input_bytes": self.input.raw.len(),
            "format": self.format.map(|f| f.as_str()),
            "steps": self.parse.as_ref().map(|p| p.test_case.steps.len()),
            "parse_confidence": self.parse.as_ref().map(|p| p.confidence),
            "intents": self.intent.as_ref().map(|i| i.intents().count()),
            "intent_confidence": self.intent.as_ref().map(|i| i.confidence),
            "platform": self.platform.as_ref().map(|p| p.result.platform_id.as_str()),
            "platform_confidence": self.platform.as_ref().map(|p| p.confidence),
            "errors": self.errors.len(),
            "warnings": self.warnings.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_builders() {
        let input = PipelineInput::new("Step 1: Open page")
            .with_format(InputFormat::PlainText)
            .with_platform_hint("workday");
        assert_eq!(input.metadata.format, Some(InputFormat::PlainText));
        assert_eq!(input.metadata.platform_hint.as_deref(), Some("workday"));
    }

    #[test]
    fn test_state_starts_empty() {
        let state = PipelineState::new(PipelineInput::new(vec![0xff, b'o', b'k']));
        assert!(state.raw_text.ends_with("ok"));
        assert!(state.parse.is_none());

        let summary = state.summary();
        assert_eq!(summary["input_bytes"], 3);
        assert!(summary["steps"].is_null());
    }

    #[test]
    fn test_input_deserializes_without_metadata() {
        let input: PipelineInput =
            serde_json::from_str(r#"{"raw": {"kind": "text", "data": "hello"}}"#).unwrap();
        assert_eq!(input.raw, RawInput::Text("hello".to_string()));
        assert_eq!(input.metadata, InputMetadata::default());
    }
}
