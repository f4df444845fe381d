use crate::intent::{self, STAGE_NAME};
use crate::pipeline::context::PipelineState;
use crate::pipeline::stage::Stage;

/// Derives semantic intents from the parsed steps
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentStage;

impl Stage for IntentStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn execute(&self, mut state: PipelineState) -> PipelineState {
        let outcome = intent::extract(state.parse.as_ref().map(|p| &p.test_case));
        state.errors.extend(outcome.errors.iter().cloned());
        state.intent = Some(outcome);
        state
    }

    fn confidence(&self, state: &PipelineState) -> f64 {
        state.intent.as_ref().map_or(0.0, |i| i.confidence)
    }
}
