//! Semantic intent extraction
//!
//! Tags every parsed step with the UI actions it implies. A step can carry
//! several intents (a "click the login button" line is both a click and an
//! authentication action) or none at all.

pub mod detectors;

use crate::error::PipelineError;
use crate::model::{ActionKind, Step, TestCase};
use crate::util::text::{clamp_unit, mean};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const STAGE_NAME: &str = "Intent extraction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Navigation,
    Authentication,
    FormInteraction,
    FormSubmission,
    SearchInteraction,
    DestructiveAction,
    EditAction,
    UiInteraction,
    Verification,
    AuthenticationVerification,
    PageVerification,
    ContentVerification,
    ErrorVerification,
    GeneralVerification,
    Timing,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::Navigation => "navigation",
            IntentType::Authentication => "authentication",
            IntentType::FormInteraction => "form_interaction",
            IntentType::FormSubmission => "form_submission",
            IntentType::SearchInteraction => "search_interaction",
            IntentType::DestructiveAction => "destructive_action",
            IntentType::EditAction => "edit_action",
            IntentType::UiInteraction => "ui_interaction",
            IntentType::Verification => "verification",
            IntentType::AuthenticationVerification => "authentication_verification",
            IntentType::PageVerification => "page_verification",
            IntentType::ContentVerification => "content_verification",
            IntentType::ErrorVerification => "error_verification",
            IntentType::GeneralVerification => "general_verification",
            IntentType::Timing => "timing",
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of UI element an intent targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Page,
    UsernameField,
    PasswordField,
    LoginButton,
    TextField,
    NameField,
    NumberField,
    DateField,
    Textarea,
    Button,
    Link,
    MenuItem,
    Checkbox,
    RadioButton,
    Dropdown,
    Listbox,
    Combobox,
    LoginStatus,
    TextElement,
    ErrorMessage,
    GenericElement,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Page => "page",
            ElementKind::UsernameField => "username_field",
            ElementKind::PasswordField => "password_field",
            ElementKind::LoginButton => "login_button",
            ElementKind::TextField => "text_field",
            ElementKind::NameField => "name_field",
            ElementKind::NumberField => "number_field",
            ElementKind::DateField => "date_field",
            ElementKind::Textarea => "textarea",
            ElementKind::Button => "button",
            ElementKind::Link => "link",
            ElementKind::MenuItem => "menu_item",
            ElementKind::Checkbox => "checkbox",
            ElementKind::RadioButton => "radio_button",
            ElementKind::Dropdown => "dropdown",
            ElementKind::Listbox => "listbox",
            ElementKind::Combobox => "combobox",
            ElementKind::LoginStatus => "login_status",
            ElementKind::TextElement => "text_element",
            ElementKind::ErrorMessage => "error_message",
            ElementKind::GenericElement => "generic_element",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticIntent {
    pub intent_type: IntentType,
    pub target: ElementKind,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub context: String,
    pub confidence: f64,
}

impl SemanticIntent {
    pub fn new(
        intent_type: IntentType,
        target: ElementKind,
        action: ActionKind,
        value: Option<String>,
        context: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            intent_type,
            target,
            action,
            value,
            context: context.into(),
            confidence: clamp_unit(confidence),
        }
    }
}

/// A parsed step together with the intents derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedStep {
    #[serde(flatten)]
    pub step: Step,
    pub target_elements: Vec<SemanticIntent>,
    pub confidence: f64,
}

impl EnrichedStep {
    pub fn from_step(step: Step) -> Self {
        let target_elements = detectors::detect(&step);
        let confidence = clamp_unit(mean(target_elements.iter().map(|i| i.confidence)));
        Self {
            step,
            target_elements,
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentOutcome {
    pub enriched_steps: Vec<EnrichedStep>,
    pub confidence: f64,
    pub errors: Vec<String>,
}

impl IntentOutcome {
    /// All intents across steps, in step order
    pub fn intents(&self) -> impl Iterator<Item = &SemanticIntent> {
        self.enriched_steps
            .iter()
            .flat_map(|s| s.target_elements.iter())
    }
}

/// Enriches every step of `test_case`.
///
/// A missing test case, or one without steps, produces an empty outcome with
/// zero confidence and an error message.
pub fn extract(test_case: Option<&TestCase>) -> IntentOutcome {
    let Some(test_case) = test_case.filter(|tc| !tc.steps.is_empty()) else {
        let err = PipelineError::missing_upstream(
            STAGE_NAME,
            "no parsed test case with steps available",
        );
        debug!(stage = STAGE_NAME, kind = err.kind(), "{}", err);
        return IntentOutcome {
            errors: vec![err.to_string()],
            ..Default::default()
        };
    };

    let enriched_steps: Vec<EnrichedStep> = test_case
        .steps
        .iter()
        .cloned()
        .map(EnrichedStep::from_step)
        .collect();
    let confidence = clamp_unit(mean(enriched_steps.iter().map(|s| s.confidence)));

    debug!(
        steps = enriched_steps.len(),
        intents = enriched_steps
            .iter()
            .map(|s| s.target_elements.len())
            .sum::<usize>(),
        confidence,
        "extracted intents"
    );

    IntentOutcome {
        enriched_steps,
        confidence,
        errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(descriptions: &[&str]) -> TestCase {
        let mut tc = TestCase::new("TC-1", "t");
        for d in descriptions {
            tc.push_step(Step::new(0, crate::parser::text::infer_action(d), *d));
        }
        tc
    }

    #[test]
    fn test_step_confidence_is_mean_of_intents() {
        let outcome = extract(Some(&case(&["Click Login button"])));
        let step = &outcome.enriched_steps[0];
        let expected = mean(step.target_elements.iter().map(|i| i.confidence));

        assert!(step.target_elements.len() >= 2);
        assert!((step.confidence - expected).abs() < 1e-9);
        assert!((outcome.confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_steps_stay_one_to_one() {
        let tc = case(&["Open https://a.example.com", "   ", "Wait 2 sec"]);
        let outcome = extract(Some(&tc));

        assert_eq!(outcome.enriched_steps.len(), 3);
        assert!(outcome.enriched_steps[1].target_elements.is_empty());
        assert_eq!(outcome.enriched_steps[1].confidence, 0.0);
        for (enriched, original) in outcome.enriched_steps.iter().zip(&tc.steps) {
            assert_eq!(&enriched.step, original);
        }
        // (0.9 + 0.0 + 0.8) / 3
        assert!((outcome.confidence - 1.7 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_upstream() {
        let outcome = extract(None);
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.errors[0].contains(STAGE_NAME));

        let outcome = extract(Some(&TestCase::new("X", "empty")));
        assert!(outcome.enriched_steps.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_intent_serialization() {
        let intent = SemanticIntent::new(
            IntentType::AuthenticationVerification,
            ElementKind::LoginStatus,
            ActionKind::Verify,
            None,
            "Verify authentication_verification",
            1.4,
        );
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["intent_type"], "authentication_verification");
        assert_eq!(value["target"], "login_status");
        assert_eq!(value["confidence"], 1.0);
        assert!(value.get("value").is_none());
    }
}
