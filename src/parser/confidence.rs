//! Parse confidence shared by every format

use crate::model::TestCase;
use crate::util::text::clamp_unit;

const BASE_WITH_STEPS: f64 = 0.4;
const PER_STEP: f64 = 0.05;
const STEP_COUNT_CAP: f64 = 0.2;
const METADATA_BONUS: f64 = 0.1;
const EXPECTED_BONUS: f64 = 0.02;
const DATA_BONUS: f64 = 0.02;
const ACTION_BONUS: f64 = 0.01;
const STRUCTURE_BONUS: f64 = 0.1;

const STRUCTURAL_KEYWORDS: &[&str] = &["step", "test case", "expected", "action"];

/// Scores how much usable structure was recovered from `raw`.
pub fn parsing_confidence(test_case: &TestCase, raw: &str) -> f64 {
    let mut score = 0.0;

    if !test_case.steps.is_empty() {
        score += BASE_WITH_STEPS;
        score += (PER_STEP * test_case.steps.len() as f64).min(STEP_COUNT_CAP);
    }

    if !test_case.has_placeholder_title() {
        score += METADATA_BONUS;
    }
    if !test_case.description.trim().is_empty() {
        score += METADATA_BONUS;
    }
    if !test_case.has_placeholder_id() {
        score += METADATA_BONUS;
    }

    for step in &test_case.steps {
        if step.has_expected_result() {
            score += EXPECTED_BONUS;
        }
        if !step.test_data.is_empty() {
            score += DATA_BONUS;
        }
        if !step.action.is_generic() {
            score += ACTION_BONUS;
        }
    }

    let raw_lower = raw.to_lowercase();
    if STRUCTURAL_KEYWORDS.iter().any(|k| raw_lower.contains(k)) {
        score += STRUCTURE_BONUS;
    }

    clamp_unit(score)
}
