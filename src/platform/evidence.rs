//! Platform evidence collection
//!
//! Every text source is tested against every profile and every evidence
//! family. Matches are never deduplicated: the same keyword found in the raw
//! input and in a step description counts twice.

use super::profile::{PlatformProfile, PlatformRegistry};
use crate::intent::EnrichedStep;
use crate::parser::text::value_text;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    UrlPattern,
    UiPattern,
    Terminology,
    ElementPattern,
    Hint,
}

impl EvidenceType {
    pub fn weight(&self) -> f64 {
        match self {
            EvidenceType::UrlPattern => 2.0,
            EvidenceType::ElementPattern => 1.5,
            EvidenceType::UiPattern => 1.2,
            EvidenceType::Terminology => 1.0,
            EvidenceType::Hint => 2.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceType::UrlPattern => "url_pattern",
            EvidenceType::UiPattern => "ui_pattern",
            EvidenceType::Terminology => "terminology",
            EvidenceType::ElementPattern => "element_pattern",
            EvidenceType::Hint => "hint",
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    RawInput,
    StepDescription,
    ElementContext,
    TestData,
    InputMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEvidence {
    pub evidence_type: EvidenceType,
    pub value: String,
    pub confidence: f64,
    pub source: EvidenceSource,
    /// Set only for hints, which credit exactly one platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl PlatformEvidence {
    fn matched(evidence_type: EvidenceType, value: &str, confidence: f64, source: EvidenceSource) -> Self {
        Self {
            evidence_type,
            value: value.to_string(),
            confidence,
            source,
            platform: None,
        }
    }

    /// Whether this record counts toward `profile`'s score
    pub fn supports(&self, profile: &PlatformProfile) -> bool {
        match self.evidence_type {
            EvidenceType::Hint => self.platform.as_deref() == Some(profile.id),
            _ => profile.lists_value(&self.value),
        }
    }
}

const URL_CONFIDENCE: f64 = 0.9;
const UI_CONFIDENCE: f64 = 0.7;
const LONG_TERM_CONFIDENCE: f64 = 0.8;
const SHORT_TERM_CONFIDENCE: f64 = 0.6;
const LONG_TERM_MIN_LEN: usize = 5;
const ELEMENT_CONFIDENCE: f64 = 0.8;
const HINT_CONFIDENCE: f64 = 0.9;

/// Matches one text against every profile in the registry.
pub fn scan_text(
    registry: &PlatformRegistry,
    text: &str,
    source: EvidenceSource,
) -> Vec<PlatformEvidence> {
    let lower = text.to_lowercase();
    let mut evidence = Vec::new();

    for profile in registry.profiles() {
        for re in &profile.url_patterns {
            if re.is_match(&lower) {
                evidence.push(PlatformEvidence::matched(
                    EvidenceType::UrlPattern,
                    PlatformProfile::url_pattern_source(re),
                    URL_CONFIDENCE,
                    source,
                ));
            }
        }

        for ui in profile.ui_patterns {
            if lower.contains(&ui.to_lowercase()) {
                evidence.push(PlatformEvidence::matched(
                    EvidenceType::UiPattern,
                    ui,
                    UI_CONFIDENCE,
                    source,
                ));
            }
        }

        for term in profile.terminology {
            if lower.contains(&term.to_lowercase()) {
                let confidence = if term.chars().count() > LONG_TERM_MIN_LEN {
                    LONG_TERM_CONFIDENCE
                } else {
                    SHORT_TERM_CONFIDENCE
                };
                evidence.push(PlatformEvidence::matched(
                    EvidenceType::Terminology,
                    term,
                    confidence,
                    source,
                ));
            }
        }

        for marker in profile.element_patterns {
            if lower.contains(&marker.to_lowercase()) {
                evidence.push(PlatformEvidence::matched(
                    EvidenceType::ElementPattern,
                    marker,
                    ELEMENT_CONFIDENCE,
                    source,
                ));
            }
        }
    }

    evidence
}

/// Gathers evidence from the raw input, step descriptions, intent contexts,
/// test data and an optional caller hint.
///
/// Returns the evidence plus warnings, such as a hint naming no known platform.
pub fn collect(
    registry: &PlatformRegistry,
    raw_input: &str,
    enriched_steps: &[EnrichedStep],
    hint: Option<&str>,
) -> (Vec<PlatformEvidence>, Vec<String>) {
    let mut evidence = scan_text(registry, raw_input, EvidenceSource::RawInput);
    let mut warnings = Vec::new();

    for enriched in enriched_steps {
        evidence.extend(scan_text(
            registry,
            &enriched.step.description,
            EvidenceSource::StepDescription,
        ));

        for intent in &enriched.target_elements {
            evidence.extend(scan_text(
                registry,
                &intent.context,
                EvidenceSource::ElementContext,
            ));
        }
    }

    for enriched in enriched_steps {
        for (key, value) in &enriched.step.test_data {
            let pair = format!("{} {}", key, value_text(value));
            evidence.extend(scan_text(registry, &pair, EvidenceSource::TestData));
        }
    }

    if let Some(hint) = hint.filter(|h| !h.trim().is_empty()) {
        match registry.resolve_hint(hint) {
            Some(profile) => evidence.push(PlatformEvidence {
                evidence_type: EvidenceType::Hint,
                value: hint.trim().to_lowercase(),
                confidence: HINT_CONFIDENCE,
                source: EvidenceSource::InputMetadata,
                platform: Some(profile.id.to_string()),
            }),
            None => warnings.push(format!(
                "Platform hint '{}' does not match any known platform; ignored",
                hint
            )),
        }
    }

    (evidence, warnings)
}
