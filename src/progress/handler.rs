//! Progress handler trait and events

use std::time::Duration;
use uuid::Uuid;

/// Events emitted while a pipeline run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { run_id: Uuid },

    /// A stage is about to execute
    StageStarted { stage: String },

    /// A stage finished with the given confidence
    StageCompleted {
        stage: String,
        confidence: f64,
        duration: Duration,
    },

    /// All stages finished
    Completed {
        overall_confidence: f64,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::Started {
            run_id: Uuid::new_v4(),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            run_id: Uuid::new_v4(),
        });
        handler.on_progress(&ProgressEvent::StageCompleted {
            stage: "Parsing".to_string(),
            confidence: 0.9,
            duration: Duration::from_millis(3),
        });
        handler.on_progress(&ProgressEvent::Completed {
            overall_confidence: 0.8,
            total_time: Duration::from_millis(10),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::StageStarted {
            stage: "Intent extraction".to_string(),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("StageStarted"));
        assert!(debug_str.contains("Intent extraction"));
    }
}
