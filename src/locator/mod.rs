//! Element location client
//!
//! The locator is the only asynchronous boundary of the pipeline. Every
//! failure degrades to a "not found" location tagged with the reason, so
//! callers never see an error from here.

mod http;

pub use http::{HttpElementLocator, LocatorError};

use crate::intent::{ElementKind, IntentType, SemanticIntent};
use crate::model::ActionKind;
use crate::util::text::{clamp_unit, mean};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const STAGE_NAME: &str = "Element location";

/// Method tags for locations that were not produced by the engine
pub mod methods {
    pub const API_ERROR: &str = "api_error";
    pub const CONNECTION_ERROR: &str = "connection_error";
    pub const INVALID_RESPONSE: &str = "invalid_response";
}

/// Hints passed alongside the intent type and platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorHints {
    pub target: ElementKind,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub context: String,
    pub step_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorRequest {
    pub intent_type: IntentType,
    pub platform: String,
    pub hints: LocatorHints,
}

impl LocatorRequest {
    pub fn for_intent(intent: &SemanticIntent, platform: &str, step_number: usize) -> Self {
        Self {
            intent_type: intent.intent_type,
            platform: platform.to_string(),
            hints: LocatorHints {
                target: intent.target,
                action: intent.action,
                value: intent.value.clone(),
                context: intent.context.clone(),
                step_number,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementLocation {
    pub found: bool,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub method: String,
}

impl ElementLocation {
    pub fn not_found(method: &str) -> Self {
        Self {
            found: false,
            selector: String::new(),
            confidence: 0.0,
            method: method.to_string(),
        }
    }
}

/// An external engine that maps an intent to a concrete selector
#[async_trait]
pub trait ElementLocator: Send + Sync {
    /// Never fails; unreachable or misbehaving engines yield `found: false`.
    async fn locate(&self, request: &LocatorRequest) -> ElementLocation;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedElement {
    pub request: LocatorRequest,
    pub location: ElementLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementOutcome {
    pub elements: Vec<LocatedElement>,
    pub confidence: f64,
}

impl ElementOutcome {
    pub fn found_count(&self) -> usize {
        self.elements.iter().filter(|e| e.location.found).count()
    }
}

/// Locates every intent, one request each, in order.
///
/// Confidence is the mean over found elements only, or 0 when nothing was
/// found.
pub async fn locate_elements<'a, I>(
    locator: &dyn ElementLocator,
    intents: I,
    platform: &str,
) -> ElementOutcome
where
    I: IntoIterator<Item = (usize, &'a SemanticIntent)>,
{
    let mut elements = Vec::new();
    for (step_number, intent) in intents {
        let request = LocatorRequest::for_intent(intent, platform, step_number);
        let location = locator.locate(&request).await;
        elements.push(LocatedElement { request, location });
    }

    let confidence = clamp_unit(mean(
        elements
            .iter()
            .filter(|e| e.location.found)
            .map(|e| e.location.confidence),
    ));

    debug!(
        stage = STAGE_NAME,
        requested = elements.len(),
        found = elements.iter().filter(|e| e.location.found).count(),
        confidence,
        "located elements"
    );

    ElementOutcome {
        elements,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Finds buttons, misses everything else
    struct ButtonsOnly;

    #[async_trait]
    impl ElementLocator for ButtonsOnly {
        async fn locate(&self, request: &LocatorRequest) -> ElementLocation {
            match request.hints.target {
                ElementKind::Button | ElementKind::LoginButton => ElementLocation {
                    found: true,
                    selector: format!("#{}", request.hints.target),
                    confidence: if request.hints.target == ElementKind::Button {
                        0.6
                    } else {
                        1.0
                    },
                    method: "fixture".to_string(),
                },
                _ => ElementLocation::not_found("fixture"),
            }
        }
    }

    fn intent(target: ElementKind) -> SemanticIntent {
        SemanticIntent::new(
            IntentType::UiInteraction,
            target,
            ActionKind::Click,
            None,
            "Click",
            0.8,
        )
    }

    #[tokio::test]
    async fn test_confidence_averages_found_only() {
        let intents = [
            intent(ElementKind::Button),
            intent(ElementKind::LoginButton),
            intent(ElementKind::Link),
        ];
        let outcome = locate_elements(
            &ButtonsOnly,
            intents.iter().enumerate().map(|(i, it)| (i + 1, it)),
            "generic_web",
        )
        .await;

        assert_eq!(outcome.elements.len(), 3);
        assert_eq!(outcome.found_count(), 2);
        assert!((outcome.confidence - 0.8).abs() < 1e-9);
        assert_eq!(outcome.elements[2].request.hints.step_number, 3);
        assert_eq!(outcome.elements[0].request.platform, "generic_web");
    }

    #[tokio::test]
    async fn test_nothing_found_is_zero() {
        let intents = [intent(ElementKind::Link)];
        let outcome = locate_elements(
            &ButtonsOnly,
            intents.iter().map(|it| (1, it)),
            "workday",
        )
        .await;
        assert_eq!(outcome.confidence, 0.0);

        let none = std::iter::empty::<(usize, &SemanticIntent)>();
        let outcome = locate_elements(&ButtonsOnly, none, "workday").await;
        assert!(outcome.elements.is_empty());
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn test_request_serialization() {
        let request = LocatorRequest::for_intent(&intent(ElementKind::Button), "servicenow", 2);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["intent_type"], "ui_interaction");
        assert_eq!(value["platform"], "servicenow");
        assert_eq!(value["hints"]["target"], "button");
        assert_eq!(value["hints"]["step_number"], 2);
    }
}
