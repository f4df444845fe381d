//! Step-pattern summary attached to a detection result

use crate::intent::{EnrichedStep, IntentType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPatterns {
    /// Intent action label -> occurrences
    pub common_actions: BTreeMap<String, usize>,
    /// Element kind -> occurrences
    pub element_types: BTreeMap<String, usize>,
    pub navigation_pattern: String,
    pub authentication_pattern: String,
}

const MULTI_STEP_AUTH: usize = 3;

impl StepPatterns {
    pub fn analyze(steps: &[EnrichedStep]) -> Self {
        let mut common_actions = BTreeMap::new();
        let mut element_types = BTreeMap::new();

        for intent in steps.iter().flat_map(|s| &s.target_elements) {
            *common_actions
                .entry(intent.action.as_str().to_string())
                .or_insert(0) += 1;
            *element_types
                .entry(intent.target.as_str().to_string())
                .or_insert(0) += 1;
        }

        Self {
            common_actions,
            element_types,
            navigation_pattern: navigation_pattern(steps).to_string(),
            authentication_pattern: authentication_pattern(steps).to_string(),
        }
    }
}

fn navigation_pattern(steps: &[EnrichedStep]) -> &'static str {
    let descriptions: Vec<String> = steps
        .iter()
        .map(|s| s.step.description.to_lowercase())
        .collect();
    let mentions = |needle: &str| descriptions.iter().any(|d| d.contains(needle));

    if mentions("app launcher") {
        "app_launcher"
    } else if mentions("menu") {
        "menu_based"
    } else if mentions("tab") {
        "tab_based"
    } else {
        "unknown"
    }
}

fn authentication_pattern(steps: &[EnrichedStep]) -> &'static str {
    let auth_steps = steps
        .iter()
        .filter(|s| {
            s.target_elements
                .iter()
                .any(|i| i.intent_type == IntentType::Authentication)
        })
        .count();

    match auth_steps {
        0 => "unknown",
        n if n >= MULTI_STEP_AUTH => "multi_step",
        _ => "simple",
    }
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
    fn test_multi_step_login() {
        let steps = enrich(&[
            "Enter username admin",
            "Enter password secret",
            "Click Login button",
        ]);
        let patterns = StepPatterns::analyze(&steps);

        assert_eq!(patterns.authentication_pattern, "multi_step");
        assert_eq!(patterns.navigation_pattern, "unknown");
        assert_eq!(patterns.element_types.get("login_button"), Some(&1));
        assert!(patterns.common_actions.get("input").copied().unwrap_or(0) >= 2);
    }

    #[test]
    fn test_navigation_precedence() {
        let steps = enrich(&["Open the App Launcher", "Pick Reports from the menu"]);
        let patterns = StepPatterns::analyze(&steps);
        assert_eq!(patterns.navigation_pattern, "app_launcher");

        let steps = enrich(&["Open the Accounts tab", "Use the menu"]);
        assert_eq!(StepPatterns::analyze(&steps).navigation_pattern, "menu_based");
        assert_eq!(StepPatterns::analyze(&[]).authentication_pattern, "unknown");
    }
}
