//! Sequential pipeline over an explicit per-run state
//!
//! Each [`Stage`] takes the [`PipelineState`] by value and returns it with its
//! own result filled in. The [`Pipeline`] threads the state through the
//! stages, reports progress, and folds the final state into a
//! [`PipelineReport`].

pub mod context;
pub mod orchestrator;
pub mod report;
pub mod stage;
pub mod stages;

pub use context::{InputMetadata, PipelineInput, PipelineState};
pub use orchestrator::Pipeline;
pub use report::{PipelineReport, Readiness, StageConfidences};
pub use stage::Stage;
