use crate::input::classify;
use crate::parser::{self, DocumentReader};
use crate::pipeline::context::PipelineState;
use crate::pipeline::stage::Stage;
use std::sync::Arc;
use tracing::debug;

pub const STAGE_NAME: &str = "Parsing";

/// Classifies the payload and parses it into a test case
#[derive(Default, Clone)]
pub struct ParseStage {
    reader: Option<Arc<dyn DocumentReader>>,
}

impl ParseStage {
    pub fn new(reader: Option<Arc<dyn DocumentReader>>) -> Self {
        Self { reader }
    }
}

impl Stage for ParseStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn execute(&self, mut state: PipelineState) -> PipelineState {
        let format = classify(&state.input.raw, state.input.metadata.format);
        let outcome = parser::parse(&state.input.raw, format, self.reader.as_deref());

        debug!(
            stage = STAGE_NAME,
            format = %format,
            method = outcome.method.as_str(),
            steps = outcome.test_case.steps.len(),
            confidence = outcome.confidence,
            "parsed input"
        );

        state.format = Some(format);
        state.errors.extend(outcome.errors.iter().cloned());
        state.warnings.extend(outcome.warnings.iter().cloned());
        state.parse = Some(outcome);
        state
    }

    fn confidence(&self, state: &PipelineState) -> f64 {
        state.parse.as_ref().map_or(0.0, |p| p.confidence)
    }
}
