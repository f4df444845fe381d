//! Degradation taxonomy for the heuristic pipeline
//!
//! None of these are raised out of a stage. Stages render them into the
//! report's error or warning lists and carry on with zero or low confidence.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The classifier could not tell the format apart and fell back to plain text
    #[error("Format detection ambiguous: {0}; falling back to plain_text parsing")]
    FormatDetectionAmbiguous(String),

    /// Malformed per-format syntax
    #[error("{format} parsing failed: {message}")]
    StructuralParseFailure { format: String, message: String },

    /// A stage ran without a usable result from the previous one
    #[error("{stage}: {reason}")]
    MissingUpstreamData { stage: String, reason: String },

    /// No platform evidence anywhere; resolved by choosing the fallback platform
    #[error("No platform evidence found; using {fallback}")]
    EvidenceExhausted { fallback: String },
}

impl PipelineError {
    pub fn parse_failure(format: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::StructuralParseFailure {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn missing_upstream(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::MissingUpstreamData {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::FormatDetectionAmbiguous(_) => "format_detection_ambiguous",
            PipelineError::StructuralParseFailure { .. } => "structural_parse_failure",
            PipelineError::MissingUpstreamData { .. } => "missing_upstream_data",
            PipelineError::EvidenceExhausted { .. } => "evidence_exhausted",
        }
    }
}
