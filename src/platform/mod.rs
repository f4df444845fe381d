//! Platform detection
//!
//! Evidence from every text source is scored against the static profile
//! registry. The best-scoring platform becomes the primary one; close
//! runners-up are reported as alternatives.

pub mod evidence;
pub mod hints;
pub mod profile;
pub mod scoring;

pub use evidence::{EvidenceSource, EvidenceType, PlatformEvidence};
pub use hints::StepPatterns;
pub use profile::{AutomationHints, PlatformProfile, PlatformRegistry, FALLBACK_PLATFORM};
pub use scoring::{PlatformScore, FALLBACK_CONFIDENCE};

use crate::error::PipelineError;
use crate::intent::EnrichedStep;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const STAGE_NAME: &str = "Platform detection";

const TOP_SCORES: usize = 3;
const STRONG_EVIDENCE: f64 = 0.7;
const MODERATE_EVIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    PatternAnalysis,
    DefaultFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub total: usize,
    /// Evidence family -> number of records
    pub by_type: BTreeMap<String, usize>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDetectionResult {
    pub platform_id: String,
    pub platform_name: String,
    pub confidence: f64,
    pub alternatives: Vec<String>,
    pub evidence_summary: EvidenceSummary,
    pub detection_method: DetectionMethod,
    pub top_scores: Vec<PlatformScore>,
    pub step_patterns: StepPatterns,
    pub automation_hints: AutomationHints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformOutcome {
    pub result: PlatformDetectionResult,
    pub confidence: f64,
    pub evidence: Vec<PlatformEvidence>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Detects the target platform for a parsed and enriched test case.
///
/// Without enriched steps the fallback platform is reported at zero
/// confidence together with an error; evidence from the raw input alone is
/// not trusted.
pub fn detect(
    registry: &PlatformRegistry,
    raw_input: &str,
    enriched_steps: &[EnrichedStep],
    hint: Option<&str>,
) -> PlatformOutcome {
    if enriched_steps.is_empty() {
        let err = PipelineError::missing_upstream(STAGE_NAME, "no enriched steps available");
        debug!(stage = STAGE_NAME, kind = err.kind(), "{}", err);
        let fallback = registry.fallback();
        return PlatformOutcome {
            result: PlatformDetectionResult {
                platform_id: fallback.id.to_string(),
                platform_name: fallback.name.to_string(),
                confidence: 0.0,
                alternatives: Vec::new(),
                evidence_summary: EvidenceSummary {
                    total: 0,
                    by_type: BTreeMap::new(),
                    explanation: "no enriched steps to analyze".to_string(),
                },
                detection_method: DetectionMethod::DefaultFallback,
                top_scores: Vec::new(),
                step_patterns: StepPatterns::analyze(&[]),
                automation_hints: fallback.hints.clone(),
            },
            confidence: 0.0,
            evidence: Vec::new(),
            errors: vec![err.to_string()],
            warnings: Vec::new(),
        };
    }

    let (evidence, warnings) = evidence::collect(registry, raw_input, enriched_steps, hint);
    let scores = scoring::score(registry, &evidence);
    let selection = scoring::select(registry, &scores);

    let profile = registry
        .get(&selection.platform_id)
        .unwrap_or_else(|| registry.fallback());

    let mut by_type = BTreeMap::new();
    for e in &evidence {
        *by_type.entry(e.evidence_type.as_str().to_string()).or_insert(0) += 1;
    }

    let (explanation, method) = if selection.exhausted {
        let exhausted = PipelineError::EvidenceExhausted {
            fallback: profile.id.to_string(),
        };
        debug!(stage = STAGE_NAME, kind = exhausted.kind(), "{}", exhausted);
        (
            "no specific platform patterns detected".to_string(),
            DetectionMethod::DefaultFallback,
        )
    } else {
        (
            explain(profile.name, selection.confidence, evidence.len()),
            DetectionMethod::PatternAnalysis,
        )
    };

    debug!(
        stage = STAGE_NAME,
        platform = %profile.id,
        confidence = selection.confidence,
        evidence = evidence.len(),
        alternatives = ?selection.alternatives,
        "selected platform"
    );

    let result = PlatformDetectionResult {
        platform_id: profile.id.to_string(),
        platform_name: profile.name.to_string(),
        confidence: selection.confidence,
        alternatives: selection.alternatives,
        evidence_summary: EvidenceSummary {
            total: evidence.len(),
            by_type,
            explanation,
        },
        detection_method: method,
        top_scores: selection.ranked.into_iter().take(TOP_SCORES).collect(),
        step_patterns: StepPatterns::analyze(enriched_steps),
        automation_hints: profile.hints.clone(),
    };

    PlatformOutcome {
        confidence: result.confidence,
        result,
        evidence,
        errors: Vec::new(),
        warnings,
    }
}

fn explain(name: &str, confidence: f64, evidence_count: usize) -> String {
    let strength = if confidence >= STRONG_EVIDENCE {
        "strong"
    } else if confidence >= MODERATE_EVIDENCE {
        "moderate"
    } else {
        "weak"
    };
    format!(
        "{} detected with {} evidence ({} signals)",
        name, strength, evidence_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use crate::parser::text::infer_action;

    fn enrich(lines: &[&str]) -> Vec<EnrichedStep> {
        lines
            .iter()
            .enumerate()
            .map(|(i, d)| EnrichedStep::from_step(Step::new(i + 1, infer_action(d), *d)))
            .collect()
    }

    #[test]
    fn test_salesforce_login_flow() {
        let raw = "Step 1: Navigate to https://login.salesforce.com\n\
                   Step 2: Enter username test@x.com\n\
                   Step 3: Click Login button";
        let steps = enrich(&[
            "Navigate to https://login.salesforce.com",
            "Enter username test@x.com",
            "Click Login button",
        ]);
        let outcome = detect(PlatformRegistry::global(), raw, &steps, None);

        assert!(outcome.result.platform_id.starts_with("salesforce"));
        assert!(outcome.confidence > 0.5);
        assert_eq!(outcome.result.detection_method, DetectionMethod::PatternAnalysis);
        assert!(outcome.result.top_scores.len() <= 3);
        assert!(outcome.result.evidence_summary.by_type.contains_key("url_pattern"));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_no_evidence_falls_back() {
        // The generic element marker "a" matches almost any text
        let steps = enrich(&["Do nothing"]);
        let outcome = detect(PlatformRegistry::global(), "Do nothing", &steps, None);

        assert_eq!(outcome.result.platform_id, FALLBACK_PLATFORM);
        assert_eq!(outcome.confidence, FALLBACK_CONFIDENCE);
        assert!(outcome.result.alternatives.is_empty());
        assert_eq!(outcome.result.detection_method, DetectionMethod::DefaultFallback);
        assert_eq!(
            outcome.result.evidence_summary.explanation,
            "no specific platform patterns detected"
        );
    }

    #[test]
    fn test_missing_steps() {
        let outcome = detect(PlatformRegistry::global(), "anything", &[], Some("workday"));
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.result.platform_id, FALLBACK_PLATFORM);
        assert!(outcome.errors[0].contains(STAGE_NAME));
    }

    #[test]
    fn test_hint_selects_platform_and_hints() {
        let steps = enrich(&["Do nothing"]);
        let outcome = detect(PlatformRegistry::global(), "", &steps, Some("Workday"));

        assert_eq!(outcome.result.platform_id, "workday");
        assert_eq!(outcome.result.platform_name, "Workday");
        assert!(outcome.result.automation_hints.shadow_dom);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unknown_hint_is_warned() {
        let steps = enrich(&["Wait 1 second"]);
        let outcome = detect(PlatformRegistry::global(), "", &steps, Some("mainframe"));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_explanation_strength() {
        assert!(explain("Workday", 0.9, 4).contains("strong"));
        assert!(explain("Workday", 0.6, 4).contains("moderate"));
        assert!(explain("Workday", 0.2, 4).contains("weak"));
    }
}
