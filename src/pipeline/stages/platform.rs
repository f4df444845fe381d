use crate::pipeline::context::PipelineState;
use crate::pipeline::stage::Stage;
use crate::platform::{self, PlatformRegistry, STAGE_NAME};

/// Scores platform evidence and selects the target platform
#[derive(Debug, Clone, Copy)]
pub struct PlatformStage {
    registry: &'static PlatformRegistry,
}

impl PlatformStage {
    pub fn new(registry: &'static PlatformRegistry) -> Self {
        Self { registry }
    }
}

impl Default for PlatformStage {
    fn default() -> Self {
        Self::new(PlatformRegistry::global())
    }
}

impl Stage for PlatformStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn execute(&self, mut state: PipelineState) -> PipelineState {
        let enriched = state
            .intent
            .as_ref()
            .map(|i| i.enriched_steps.as_slice())
            .unwrap_or_default();
        let outcome = platform::detect(
            self.registry,
            &state.raw_text,
            enriched,
            state.input.metadata.platform_hint.as_deref(),
        );

        state.errors.extend(outcome.errors.iter().cloned());
        state.warnings.extend(outcome.warnings.iter().cloned());
        state.platform = Some(outcome);
        state
    }

    fn confidence(&self, state: &PipelineState) -> f64 {
        state.platform.as_ref().map_or(0.0, |p| p.confidence)
    }
}
