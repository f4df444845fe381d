//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { run_id } => {
                info!(run_id = %run_id, "Starting pipeline run");
            }
            ProgressEvent::StageStarted { stage } => {
                debug!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageCompleted {
                stage,
                confidence,
                duration,
            } => {
                info!(
                    stage = %stage,
                    confidence = *confidence,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::Completed {
                overall_confidence,
                total_time,
            } => {
                info!(
                    overall_confidence = *overall_confidence,
                    total_time_ms = total_time.as_millis(),
                    "Pipeline run complete"
                );
            }
        }
    }
}
