//! Normalized test-case model shared by every pipeline stage

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key/value test data attached to a step. Equality ignores insertion order.
pub type TestData = IndexMap<String, serde_json::Value>;

/// Placeholder identifiers and titles produced when the input does not carry one.
pub const PLACEHOLDER_IDS: &[&str] = &[
    "AUTO_GENERATED",
    "GHERKIN_AUTO",
    "JSON_AUTO",
    "CSV_AUTO",
    "CSV_EMPTY",
    "EXCEL_AUTO",
    "WORD_AUTO",
    "ERROR",
    "EXCEL_ERROR",
    "WORD_ERROR",
];

pub const PLACEHOLDER_TITLES: &[&str] = &[
    "Untitled Test Case",
    "Gherkin Feature",
    "JSON Test Case",
    "CSV Test Case",
    "Excel Test Case",
    "Word Test Case",
    "JSON Parse Error",
    "Empty CSV",
    "Excel Parse Error",
    "Word Parse Error",
];

/// What a step does, as far as the parser can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
    Input,
    Select,
    Verify,
    Wait,
    #[default]
    Generic,
    // Gherkin keyword kinds
    Setup,
    Action,
    Verification,
    Continuation,
    Exception,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::Input => "input",
            ActionKind::Select => "select",
            ActionKind::Verify => "verify",
            ActionKind::Wait => "wait",
            ActionKind::Generic => "generic",
            ActionKind::Setup => "setup",
            ActionKind::Action => "action",
            ActionKind::Verification => "verification",
            ActionKind::Continuation => "continuation",
            ActionKind::Exception => "exception",
        }
    }

    /// Parse a free-form action label such as `"click"` or `"Navigate"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "navigate" => Some(ActionKind::Navigate),
            "click" => Some(ActionKind::Click),
            "input" => Some(ActionKind::Input),
            "select" => Some(ActionKind::Select),
            "verify" => Some(ActionKind::Verify),
            "wait" => Some(ActionKind::Wait),
            "generic" => Some(ActionKind::Generic),
            "setup" => Some(ActionKind::Setup),
            "action" => Some(ActionKind::Action),
            "verification" => Some(ActionKind::Verification),
            "continuation" => Some(ActionKind::Continuation),
            "exception" => Some(ActionKind::Exception),
            _ => None,
        }
    }

    /// `Action` (Gherkin `When`) names no concrete UI action, so it counts
    /// as generic alongside `Generic`.
    pub fn is_generic(&self) -> bool {
        matches!(self, ActionKind::Generic | ActionKind::Action)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step_number: usize,
    pub action: ActionKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub test_data: TestData,
    /// Original Gherkin keyword (`Given`, `When`, ...) for steps parsed from feature files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gherkin_keyword: Option<String>,
}

impl Step {
    pub fn new(step_number: usize, action: ActionKind, description: impl Into<String>) -> Self {
        Self {
            step_number,
            action,
            description: description.into(),
            expected_result: None,
            test_data: TestData::new(),
            gherkin_keyword: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected_result = Some(expected.into());
        self
    }

    pub fn with_data(mut self, test_data: TestData) -> Self {
        self.test_data = test_data;
        self
    }

    pub fn has_expected_result(&self) -> bool {
        self.expected_result
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<Step>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Append a step, assigning the next 1-based step number.
    pub fn push_step(&mut self, mut step: Step) {
        step.step_number = self.steps.len() + 1;
        self.steps.push(step);
    }

    pub fn has_placeholder_id(&self) -> bool {
        self.id.trim().is_empty() || PLACEHOLDER_IDS.contains(&self.id.as_str())
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title.trim().is_empty() || PLACEHOLDER_TITLES.contains(&self.title.as_str())
    }

    /// Step numbers are 1-based, unique and strictly increasing.
    pub fn steps_well_ordered(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(i, s)| s.step_number == i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_step_numbers_sequentially() {
        let mut tc = TestCase::new("TC-1", "Login");
        tc.push_step(Step::new(99, ActionKind::Navigate, "open"));
        tc.push_step(Step::new(0, ActionKind::Click, "click"));

        assert_eq!(tc.steps[0].step_number, 1);
        assert_eq!(tc.steps[1].step_number, 2);
        assert!(tc.steps_well_ordered());
    }

    #[test]
    fn test_placeholder_detection() {
        let tc = TestCase::new("JSON_AUTO", "JSON Test Case");
        assert!(tc.has_placeholder_id());
        assert!(tc.has_placeholder_title());

        let tc = TestCase::new("TC-42", "Checkout flow");
        assert!(!tc.has_placeholder_id());
        assert!(!tc.has_placeholder_title());
    }

    #[test]
    fn test_test_data_equality_ignores_order() {
        let mut a = TestData::new();
        a.insert("user".into(), json!("alice"));
        a.insert("pass".into(), json!("secret"));

        let mut b = TestData::new();
        b.insert("pass".into(), json!("secret"));
        b.insert("user".into(), json!("alice"));

        assert_eq!(a, b);
    }

    #[test]
    fn test_action_kind_labels() {
        assert_eq!(ActionKind::from_label(" Click "), Some(ActionKind::Click));
        assert_eq!(ActionKind::from_label("teleport"), None);
        assert_eq!(ActionKind::Verification.to_string(), "verification");
        assert!(ActionKind::Action.is_generic());
        assert!(!ActionKind::Setup.is_generic());
        assert_eq!(
            serde_json::to_value(ActionKind::Navigate).unwrap(),
            json!("navigate")
        );
    }
}
