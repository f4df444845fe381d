//! Weighted evidence scoring and platform selection

use super::evidence::{EvidenceType, PlatformEvidence};
use super::profile::PlatformRegistry;
use crate::util::text::clamp_unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const DIVERSITY_BONUS: f64 = 0.1;
const FALLBACK_DAMPING: f64 = 0.5;
const ALTERNATIVE_THRESHOLD: f64 = 0.3;
const MAX_ALTERNATIVES: usize = 3;
const STRONG_RUNNER_UP: f64 = 0.7;
const AMBIGUITY_DISCOUNT: f64 = 0.8;
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformScore {
    pub platform_id: String,
    pub raw: f64,
    pub normalized: f64,
    pub evidence_count: usize,
}

/// Scores every registered platform, in registry order.
///
/// Raw score is the confidence-weighted evidence sum plus a bonus per distinct
/// evidence family. The fallback profile's weighted sum is halved. Scores are
/// then divided by the maximum, so the best platform scores 1.0 unless there
/// is no evidence at all.
pub fn score(registry: &PlatformRegistry, evidence: &[PlatformEvidence]) -> Vec<PlatformScore> {
    let mut scores: Vec<PlatformScore> = registry
        .profiles()
        .iter()
        .map(|profile| {
            let supporting: Vec<&PlatformEvidence> =
                evidence.iter().filter(|e| e.supports(profile)).collect();

            let mut weighted: f64 = supporting
                .iter()
                .map(|e| e.confidence * e.evidence_type.weight())
                .sum();
            if profile.is_fallback() {
                weighted *= FALLBACK_DAMPING;
            }

            let families: BTreeSet<EvidenceType> =
                supporting.iter().map(|e| e.evidence_type).collect();
            let raw = weighted + DIVERSITY_BONUS * families.len() as f64;

            PlatformScore {
                platform_id: profile.id.to_string(),
                raw,
                normalized: 0.0,
                evidence_count: supporting.len(),
            }
        })
        .collect();

    let max = scores.iter().map(|s| s.raw).fold(0.0_f64, f64::max);
    if max > 0.0 {
        for s in &mut scores {
            s.normalized = clamp_unit(s.raw / max);
        }
    }
    scores
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub platform_id: String,
    pub confidence: f64,
    pub alternatives: Vec<String>,
    /// Highest-scoring platforms, best first
    pub ranked: Vec<PlatformScore>,
    /// True when no platform had any evidence
    pub exhausted: bool,
}

/// Picks the primary platform and alternatives from `scores`.
pub fn select(registry: &PlatformRegistry, scores: &[PlatformScore]) -> Selection {
    let mut ranked = scores.to_vec();
    // Stable: ties keep registry order
    ranked.sort_by(|a, b| b.normalized.total_cmp(&a.normalized));

    let top = match ranked.first() {
        Some(top) if top.normalized > 0.0 => top.clone(),
        _ => {
            return Selection {
                platform_id: registry.fallback().id.to_string(),
                confidence: FALLBACK_CONFIDENCE,
                alternatives: Vec::new(),
                ranked,
                exhausted: true,
            }
        }
    };

    let alternatives: Vec<String> = ranked
        .iter()
        .skip(1)
        .filter(|s| s.normalized > ALTERNATIVE_THRESHOLD)
        .take(MAX_ALTERNATIVES)
        .map(|s| s.platform_id.clone())
        .collect();

    let mut confidence = clamp_unit(top.normalized);
    if ranked
        .get(1)
        .is_some_and(|runner_up| runner_up.normalized > STRONG_RUNNER_UP)
    {
        confidence *= AMBIGUITY_DISCOUNT;
    }

    Selection {
        platform_id: top.platform_id,
        confidence,
        alternatives,
        ranked,
        exhausted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::evidence::EvidenceSource;

    fn ev(evidence_type: EvidenceType, value: &str, confidence: f64) -> PlatformEvidence {
        PlatformEvidence {
            evidence_type,
            value: value.to_string(),
            confidence,
            source: EvidenceSource::RawInput,
            platform: None,
        }
    }

    fn hint(platform: &str) -> PlatformEvidence {
        PlatformEvidence {
            evidence_type: EvidenceType::Hint,
            value: platform.to_string(),
            confidence: 0.9,
            source: EvidenceSource::InputMetadata,
            platform: Some(platform.to_string()),
        }
    }

    fn raw_of<'a>(scores: &'a [PlatformScore], id: &str) -> &'a PlatformScore {
        scores.iter().find(|s| s.platform_id == id).unwrap()
    }

    #[test]
    fn test_weights_and_diversity_bonus() {
        let registry = PlatformRegistry::with_defaults();
        let evidence = vec![
            ev(EvidenceType::UiPattern, "incident", 0.7),
            ev(EvidenceType::Terminology, "cmdb", 0.6),
        ];
        let scores = score(&registry, &evidence);
        let sn = raw_of(&scores, "servicenow");

        // 0.7 * 1.2 + 0.6 * 1.0 + 2 families * 0.1
        assert!((sn.raw - 1.64).abs() < 1e-9);
        assert_eq!(sn.normalized, 1.0);
        assert_eq!(sn.evidence_count, 2);
    }

    #[test]
    fn test_fallback_profile_is_damped() {
        let registry = PlatformRegistry::with_defaults();
        let evidence = vec![ev(EvidenceType::Terminology, "submit", 0.6)];
        let scores = score(&registry, &evidence);
        let generic = raw_of(&scores, "generic_web");

        assert!((generic.raw - (0.6 * 0.5 + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_no_evidence_selects_fallback() {
        let registry = PlatformRegistry::with_defaults();
        let scores = score(&registry, &[]);
        assert!(scores.iter().all(|s| s.normalized == 0.0));

        let selection = select(&registry, &scores);
        assert_eq!(selection.platform_id, "generic_web");
        assert_eq!(selection.confidence, FALLBACK_CONFIDENCE);
        assert!(selection.alternatives.is_empty());
        assert!(selection.exhausted);
    }

    #[test]
    fn test_weak_runner_up_is_alternative_without_discount() {
        let registry = PlatformRegistry::with_defaults();
        // Shared terminology credits both salesforce profiles
        let evidence = vec![
            ev(EvidenceType::Terminology, "opportunity", 0.8),
            ev(EvidenceType::UiPattern, "app launcher", 0.7),
        ];
        let selection = select(&registry, &score(&registry, &evidence));

        assert_eq!(selection.platform_id, "salesforce_lightning");
        assert_eq!(selection.alternatives, vec!["salesforce_classic".to_string()]);
        assert_eq!(selection.confidence, 1.0);
    }

    #[test]
    fn test_ties_keep_registry_order() {
        let registry = PlatformRegistry::with_defaults();
        let evidence = vec![ev(EvidenceType::Terminology, "sap", 0.6)];
        let selection = select(&registry, &score(&registry, &evidence));

        assert_eq!(selection.platform_id, "sap_fiori");
        assert_eq!(selection.alternatives, vec!["sap_gui".to_string()]);
        assert!((selection.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_hint_outweighs_terminology() {
        let registry = PlatformRegistry::with_defaults();
        let evidence = vec![ev(EvidenceType::Terminology, "dashboard", 0.6), hint("oracle_cloud")];
        let selection = select(&registry, &score(&registry, &evidence));

        assert_eq!(selection.platform_id, "oracle_cloud");
        assert_eq!(selection.confidence, 1.0);
        // workday: 0.7 / 3.05 falls under the alternative threshold
        assert!(selection.alternatives.is_empty());
    }
}
