use super::context::{PipelineInput, PipelineState};
use super::report::PipelineReport;
use super::stage::Stage;
use super::stages::{IntentStage, ParseStage, PlatformStage};
use crate::config::{CasewrightConfig, ReadinessThresholds};
use crate::heuristics::HeuristicLogger;
use crate::locator::{self, ElementLocator};
use crate::parser::DocumentReader;
use crate::progress::{ProgressEvent, ProgressHandler};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs the parse, intent and platform stages in order and, optionally, the
/// element locator over the resulting intents.
///
/// A `Pipeline` holds no per-run state and can be shared across tasks.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    heuristic_logger: HeuristicLogger,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
    readiness: ReadinessThresholds,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_reader(None)
    }

    /// Pipeline whose parser can read spreadsheet and word-processor payloads
    pub fn with_reader(reader: Option<Arc<dyn DocumentReader>>) -> Self {
        Self {
            stages: vec![
                Box::new(ParseStage::new(reader)),
                Box::new(IntentStage),
                Box::new(PlatformStage::default()),
            ],
            heuristic_logger: HeuristicLogger::disabled(),
            progress_handler: None,
            readiness: ReadinessThresholds::default(),
        }
    }

    pub fn from_config(
        config: &CasewrightConfig,
        reader: Option<Arc<dyn DocumentReader>>,
    ) -> Self {
        Self::with_reader(reader)
            .with_heuristic_logger(HeuristicLogger::new(config.heuristic_log.clone()))
            .with_readiness(config.readiness)
    }

    pub fn with_heuristic_logger(mut self, logger: HeuristicLogger) -> Self {
        self.heuristic_logger = logger;
        self
    }

    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessThresholds) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    fn run_stages(&self, input: PipelineInput) -> PipelineState {
        let mut state = PipelineState::new(input);
        info!(
            run_id = %state.run_id,
            bytes = state.input.raw.len(),
            "Starting pipeline run"
        );
        self.notify(ProgressEvent::Started {
            run_id: state.run_id,
        });

        for stage in &self.stages {
            let name = stage.name();
            self.notify(ProgressEvent::StageStarted {
                stage: name.to_string(),
            });

            let before = self
                .heuristic_logger
                .is_enabled()
                .then(|| state.summary());
            let stage_start = Instant::now();
            state = stage.execute(state);
            let duration = stage_start.elapsed();
            let confidence = stage.confidence(&state);

            if let Some(before) = before {
                self.heuristic_logger.log_stage(
                    name,
                    &before,
                    &state.summary(),
                    duration.as_millis() as u64,
                );
            }

            debug!(
                stage = name,
                confidence,
                elapsed_ms = duration.as_millis(),
                "Stage complete"
            );
            self.notify(ProgressEvent::StageCompleted {
                stage: name.to_string(),
                confidence,
                duration,
            });
        }

        state
    }

    fn finish(&self, state: PipelineState, start: Instant) -> PipelineReport {
        let report = PipelineReport::from_state(state, &self.readiness);
        info!(
            run_id = %report.run_id,
            platform = %report.platform.platform_id,
            overall_confidence = report.overall_confidence,
            errors = report.errors.len(),
            "Pipeline run complete"
        );
        self.notify(ProgressEvent::Completed {
            overall_confidence: report.overall_confidence,
            total_time: start.elapsed(),
        });
        report
    }

    /// Runs the heuristic stages only; the report has no element confidence.
    pub fn run(&self, input: PipelineInput) -> PipelineReport {
        let start = Instant::now();
        let state = self.run_stages(input);
        self.finish(state, start)
    }

    /// Runs the heuristic stages, then resolves every derived intent through
    /// `locator`. Locator failures only lower the element confidence.
    pub async fn run_with_locator(
        &self,
        input: PipelineInput,
        locator: &dyn ElementLocator,
    ) -> PipelineReport {
        let start = Instant::now();
        let mut state = self.run_stages(input);

        let platform_id = state
            .platform
            .as_ref()
            .map(|p| p.result.platform_id.clone())
            .unwrap_or_default();
        let intents: Vec<_> = state
            .intent
            .iter()
            .flat_map(|i| &i.enriched_steps)
            .flat_map(|s| s.target_elements.iter().map(move |t| (s.step.step_number, t)))
            .collect();

        self.notify(ProgressEvent::StageStarted {
            stage: locator::STAGE_NAME.to_string(),
        });
        let stage_start = Instant::now();
        let outcome = locator::locate_elements(locator, intents, &platform_id).await;
        self.notify(ProgressEvent::StageCompleted {
            stage: locator::STAGE_NAME.to_string(),
            confidence: outcome.confidence,
            duration: stage_start.elapsed(),
        });

        state.elements = Some(outcome);
        self.finish(state, start)
    }
}
