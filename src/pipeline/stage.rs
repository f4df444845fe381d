use super::context::PipelineState;

/// One step of the pipeline: consumes the state and hands back an enriched
/// copy. Stages never fail; degraded results carry low confidence and
/// error strings instead.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, state: PipelineState) -> PipelineState;

    /// Confidence this stage recorded in `state`, once it has run
    fn confidence(&self, state: &PipelineState) -> f64;
}
