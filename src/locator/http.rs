//! HTTP client for the element-location engine

use super::{methods, ElementLocation, ElementLocator, LocatorRequest};
use crate::config::CasewrightConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const FIND_ELEMENT_PATH: &str = "find_element_comprehensive";

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LocatorError {
    /// Method tag reported on the degraded location
    pub fn method(&self) -> &'static str {
        match self {
            LocatorError::Api { .. } => methods::API_ERROR,
            LocatorError::Timeout { .. } | LocatorError::Connection(_) => {
                methods::CONNECTION_ERROR
            }
            LocatorError::InvalidResponse(_) => methods::INVALID_RESPONSE,
        }
    }
}

/// Engine response body; absent fields read as not found
#[derive(Debug, Deserialize)]
struct FindElementResponse {
    #[serde(default)]
    found: bool,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    method: Option<String>,
}

/// Element locator backed by the engine's HTTP API
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct HttpElementLocator {
    endpoint: String,
    http_client: Client,
    timeout: Duration,
}

impl HttpElementLocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http_client,
            timeout,
        })
    }

    pub fn from_config(config: &CasewrightConfig) -> anyhow::Result<Self> {
        Self::new(config.locator_endpoint.clone(), config.locator_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn find_element(
        &self,
        request: &LocatorRequest,
    ) -> Result<ElementLocation, LocatorError> {
        let url = format!("{}/{}", self.endpoint, FIND_ELEMENT_PATH);
        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocatorError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    LocatorError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LocatorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: FindElementResponse = response
            .json()
            .await
            .map_err(|e| LocatorError::InvalidResponse(e.to_string()))?;

        debug!(
            intent = %request.intent_type,
            found = body.found,
            elapsed_ms = start.elapsed().as_millis(),
            "element locator responded"
        );

        Ok(ElementLocation {
            found: body.found,
            selector: body.selector.unwrap_or_default(),
            confidence: body.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
            method: body.method.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ElementLocator for HttpElementLocator {
    async fn locate(&self, request: &LocatorRequest) -> ElementLocation {
        match self.find_element(request).await {
            Ok(location) => location,
            Err(e) => {
                warn!(
                    endpoint = %self.endpoint,
                    intent = %request.intent_type,
                    error = %e,
                    "element location failed"
                );
                ElementLocation::not_found(e.method())
            }
        }
    }
}
