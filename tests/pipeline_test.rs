//! End-to-end pipeline tests
//!
//! Covers the documented behaviors of a full run:
//! - Login flow on Salesforce
//! - Empty and malformed input
//! - Step ordering and structured round-trips
//! - Confidence bounds and platform fallback

use casewright::intent::{ElementKind, IntentType};
use casewright::platform::{DetectionMethod, FALLBACK_PLATFORM};
use casewright::{InputFormat, Pipeline, PipelineInput, PipelineReport};
use serde_json::json;

fn run(input: PipelineInput) -> PipelineReport {
    Pipeline::new().run(input)
}

fn assert_unit(value: f64, what: &str) {
    assert!((0.0..=1.0).contains(&value), "{} out of range: {}", what, value);
}

#[test]
fn test_salesforce_login_flow() {
    let report = run(PipelineInput::new(
        "Step 1: Navigate to https://login.salesforce.com\n\
         Step 2: Enter username test@x.com\n\
         Step 3: Click Login button",
    ));

    assert_eq!(report.test_case.steps.len(), 3);
    let steps = &report.enriched_steps;

    let nav = steps[0]
        .target_elements
        .iter()
        .find(|i| i.intent_type == IntentType::Navigation)
        .expect("navigation intent");
    assert_eq!(nav.value.as_deref(), Some("https://login.salesforce.com"));

    let username = steps[1]
        .target_elements
        .iter()
        .find(|i| i.target == ElementKind::UsernameField)
        .expect("username intent");
    assert_eq!(username.intent_type, IntentType::Authentication);
    assert_eq!(username.value.as_deref(), Some("test@x.com"));

    let third = &steps[2].target_elements;
    assert!(third.iter().any(|i| i.target == ElementKind::LoginButton));
    assert!(third
        .iter()
        .any(|i| i.action == casewright::ActionKind::Click && i.target == ElementKind::Button));

    assert!(report.platform.platform_id.starts_with("salesforce"));
    assert!(report.platform.confidence > 0.5);
    assert!(report.errors.is_empty());
}

#[test]
fn test_empty_input() {
    for raw in ["", "   \n\t  \n"] {
        let report = run(PipelineInput::new(raw));

        assert_eq!(report.format, InputFormat::PlainText);
        assert!(report.test_case.steps.is_empty());
        assert!(report.confidences.parsing <= 0.1);
        assert!(report.test_case.has_placeholder_title());
        assert_eq!(report.confidences.intent, 0.0);
        assert_eq!(report.platform.confidence, 0.0);
    }
}

#[test]
fn test_malformed_json() {
    let report = run(PipelineInput::new("{ bad json").with_format(InputFormat::Json));

    assert_eq!(report.confidences.parsing, 0.0);
    assert!(!report.errors.is_empty());
    assert!(report.errors[0].starts_with("JSON parsing failed"));
    assert_eq!(report.test_case.id, "ERROR");
    assert!(report.test_case.has_placeholder_id());
}

#[test]
fn test_numbered_steps_keep_order() {
    for n in 1..=7 {
        let raw: Vec<String> = (1..=n)
            .map(|i| format!("Step {}: Click item {} button", i, i))
            .collect();
        let report = run(PipelineInput::new(raw.join("\n")));

        assert_eq!(report.test_case.steps.len(), n, "n = {}", n);
        for (i, step) in report.test_case.steps.iter().enumerate() {
            assert_eq!(step.step_number, i + 1);
            assert!(step.description.contains(&format!("item {} ", i + 1)));
        }
    }
}

#[test]
fn test_structured_json_round_trip() {
    let source = json!({
        "test_id": "TC-42",
        "title": "Create opportunity",
        "description": "Sales rep creates an opportunity",
        "steps": [
            {"action": "navigate", "description": "Open Opportunities", "expected": "List view shown",
             "data": {"url": "https://acme.lightning.force.com"}},
            {"action": "input", "description": "Enter name", "expected": "Name filled",
             "data": {"name": "Big Deal"}},
            {"action": "click", "description": "Click Save button", "expected": "Record saved",
             "data": {"button": "Save"}}
        ]
    });
    let report = run(PipelineInput::new(source.to_string()));

    assert_eq!(report.format, InputFormat::Json);
    assert!(report.confidences.parsing >= 0.9);

    let tc = &report.test_case;
    assert_eq!(tc.id, "TC-42");
    assert_eq!(tc.title, "Create opportunity");
    assert_eq!(tc.description, "Sales rep creates an opportunity");
    for (step, expected) in tc.steps.iter().zip(source["steps"].as_array().unwrap()) {
        assert_eq!(step.action.as_str(), expected["action"]);
        assert_eq!(step.description, expected["description"]);
        assert_eq!(step.expected_result.as_deref(), expected["expected"].as_str());
        assert_eq!(json!(step.test_data), expected["data"]);
    }
}

#[test]
fn test_url_wins_over_quoted_text() {
    let report = run(PipelineInput::new(
        "Step 1: Navigate to https://portal.example.com and open 'Reports'",
    ));
    let nav = report
        .intents
        .iter()
        .find(|i| i.intent_type == IntentType::Navigation)
        .expect("navigation intent");
    assert_eq!(nav.value.as_deref(), Some("https://portal.example.com"));
}

#[test]
fn test_confidences_bounded_under_repetition() {
    let noisy = "salesforce lightning opportunity app launcher slds- ".repeat(40);
    let raw = format!(
        "Step 1: Click {} button\nStep 2: Verify {} appears\nStep 3: Enter {} into name",
        noisy, noisy, noisy
    );
    let report = run(PipelineInput::new(raw).with_platform_hint("salesforce"));

    assert_unit(report.confidences.parsing, "parsing");
    assert_unit(report.confidences.intent, "intent");
    assert_unit(report.platform.confidence, "platform");
    assert_unit(report.overall_confidence, "overall");
    for step in &report.enriched_steps {
        assert_unit(step.confidence, "step");
        for intent in &step.target_elements {
            assert_unit(intent.confidence, "intent");
        }
    }
    for score in &report.platform.top_scores {
        assert_unit(score.normalized, "normalized score");
    }
}

#[test]
fn test_zero_evidence_falls_back() {
    // No profile lists any substring of this text
    let report = run(PipelineInput::new("Step 1: Do nothing"));

    assert_eq!(report.platform.platform_id, FALLBACK_PLATFORM);
    assert_eq!(report.platform.confidence, 0.5);
    assert!(report.platform.alternatives.is_empty());
    assert_eq!(report.platform.detection_method, DetectionMethod::DefaultFallback);
}

#[test]
fn test_report_serializes() {
    let report = run(PipelineInput::new("Step 1: Click Save button"));
    let value = serde_json::to_value(&report).unwrap();

    assert!(value["run_id"].is_string());
    assert_eq!(value["format"], "plain_text");
    assert_eq!(value["parse_method"], "plain_text_parser");
    assert!(value["confidences"].get("element").is_none());
    assert!(value["readiness"]["parsing"].is_boolean());
}
