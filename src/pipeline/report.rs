//! Cross-stage aggregation and the final run report

use super::context::PipelineState;
use crate::config::ReadinessThresholds;
use crate::input::InputFormat;
use crate::intent::{EnrichedStep, SemanticIntent};
use crate::locator::ElementOutcome;
use crate::model::TestCase;
use crate::parser::plain_text::{PLACEHOLDER_ID, PLACEHOLDER_TITLE};
use crate::parser::ParseMethod;
use crate::platform::{self, PlatformDetectionResult, PlatformRegistry};
use crate::util::text::clamp_unit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PARSE_WEIGHT: f64 = 0.2;
const INTENT_WEIGHT: f64 = 0.3;
const PLATFORM_WEIGHT: f64 = 0.2;
const ELEMENT_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageConfidences {
    pub parsing: f64,
    pub intent: f64,
    pub platform: f64,
    /// Present only when the element locator ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<f64>,
}

impl StageConfidences {
    /// Weighted mean of the stage confidences. Without an element result the
    /// remaining weights are renormalized.
    pub fn overall(&self) -> f64 {
        let base = self.parsing * PARSE_WEIGHT
            + self.intent * INTENT_WEIGHT
            + self.platform * PLATFORM_WEIGHT;
        let overall = match self.element {
            Some(element) => base + element * ELEMENT_WEIGHT,
            None => base / (PARSE_WEIGHT + INTENT_WEIGHT + PLATFORM_WEIGHT),
        };
        clamp_unit(overall)
    }
}

/// Whether each stage met its configured minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub parsing: bool,
    pub intent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<bool>,
}

impl Readiness {
    pub fn evaluate(confidences: &StageConfidences, thresholds: &ReadinessThresholds) -> Self {
        Self {
            parsing: confidences.parsing >= thresholds.parse,
            intent: confidences.intent >= thresholds.intent,
            element: confidences.element.map(|e| e >= thresholds.element),
        }
    }

    /// All evaluated stages met their thresholds
    pub fn ready_for_automation(&self) -> bool {
        self.parsing && self.intent && self.element.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub format: InputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_method: Option<ParseMethod>,
    pub test_case: TestCase,
    pub confidences: StageConfidences,
    pub enriched_steps: Vec<EnrichedStep>,
    pub intents: Vec<SemanticIntent>,
    pub platform: PlatformDetectionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<ElementOutcome>,
    pub overall_confidence: f64,
    pub readiness: Readiness,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PipelineReport {
    /// Builds the report from a finished state. Slots left empty by a stage
    /// that never ran read as zero-confidence placeholders.
    pub fn from_state(state: PipelineState, thresholds: &ReadinessThresholds) -> Self {
        let PipelineState {
            run_id,
            raw_text: _,
            input: _,
            format,
            parse,
            intent,
            platform,
            elements,
            errors,
            warnings,
        } = state;

        let platform = platform
            .unwrap_or_else(|| platform::detect(PlatformRegistry::global(), "", &[], None));
        let intent = intent.unwrap_or_default();

        let confidences = StageConfidences {
            parsing: parse.as_ref().map_or(0.0, |p| p.confidence),
            intent: intent.confidence,
            platform: platform.confidence,
            element: elements.as_ref().map(|e| e.confidence),
        };

        let intents = intent.intents().cloned().collect();
        let (test_case, parse_method) = match parse {
            Some(p) => (p.test_case, Some(p.method)),
            None => (TestCase::new(PLACEHOLDER_ID, PLACEHOLDER_TITLE), None),
        };

        Self {
            run_id,
            format: format.unwrap_or(InputFormat::Unknown),
            parse_method,
            test_case,
            overall_confidence: confidences.overall(),
            readiness: Readiness::evaluate(&confidences, thresholds),
            confidences,
            enriched_steps: intent.enriched_steps,
            intents,
            platform: platform.result,
            elements,
            errors,
            warnings,
        }
    }
}
