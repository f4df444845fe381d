//! Element location through the pipeline
//!
//! The engine is never available in tests; these cover degradation only.

use casewright::locator::{methods, HttpElementLocator};
use casewright::{Pipeline, PipelineInput};
use std::time::Duration;

const LOGIN_FLOW: &str = "Step 1: Navigate to https://login.salesforce.com\n\
                          Step 2: Enter username test@x.com\n\
                          Step 3: Click Login button";

#[tokio::test]
async fn test_unreachable_engine_degrades_to_not_found() {
    let locator = HttpElementLocator::new("http://127.0.0.1:1", Duration::from_secs(2))
        .expect("client builds");
    let report = Pipeline::new()
        .run_with_locator(PipelineInput::new(LOGIN_FLOW), &locator)
        .await;

    let elements = report.elements.as_ref().expect("locator ran");
    assert_eq!(elements.elements.len(), report.intents.len());
    assert!(elements
        .elements
        .iter()
        .all(|e| !e.location.found && e.location.method == methods::CONNECTION_ERROR));

    assert_eq!(report.confidences.element, Some(0.0));
    assert_eq!(report.readiness.element, Some(false));
    assert!(!report.readiness.ready_for_automation());
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_requests_carry_platform_and_step() {
    let locator = HttpElementLocator::new("http://127.0.0.1:1/", Duration::from_secs(1))
        .expect("client builds");
    let report = Pipeline::new()
        .run_with_locator(PipelineInput::new(LOGIN_FLOW), &locator)
        .await;

    let elements = &report.elements.as_ref().expect("locator ran").elements;
    assert!(elements
        .iter()
        .all(|e| e.request.platform == report.platform.platform_id));
    assert_eq!(elements.first().map(|e| e.request.hints.step_number), Some(1));
    assert_eq!(elements.last().map(|e| e.request.hints.step_number), Some(3));
}

#[tokio::test]
async fn test_element_term_lowers_overall() {
    let locator = HttpElementLocator::new("http://127.0.0.1:1", Duration::from_secs(1))
        .expect("client builds");
    let pipeline = Pipeline::new();

    let without = pipeline.run(PipelineInput::new(LOGIN_FLOW));
    let with = pipeline
        .run_with_locator(PipelineInput::new(LOGIN_FLOW), &locator)
        .await;

    // Element weight 0.3 at zero confidence versus renormalized remainder
    assert!((with.overall_confidence - without.overall_confidence * 0.7).abs() < 1e-9);
}
