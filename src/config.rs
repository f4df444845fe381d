//! Configuration management for casewright
//!
//! Settings are loaded from environment variables with defaults. The heuristic
//! stages themselves are not configurable; configuration covers the element
//! locator client, logging and readiness thresholds.
//!
//! # Environment Variables
//!
//! - `CASEWRIGHT_LOCATOR_ENDPOINT`: element locator base URL - default: "http://localhost:8000"
//! - `CASEWRIGHT_LOCATOR_TIMEOUT`: locator request timeout in seconds - default: "30"
//! - `CASEWRIGHT_LOG_LEVEL`: logging level - default: "info"
//! - `CASEWRIGHT_HEURISTIC_LOG`: JSONL file receiving per-stage heuristic records - default: unset
//! - `CASEWRIGHT_MIN_PARSE_CONFIDENCE`: readiness threshold for parsing - default: "0.5"
//! - `CASEWRIGHT_MIN_INTENT_CONFIDENCE`: readiness threshold for intents - default: "0.4"
//! - `CASEWRIGHT_MIN_ELEMENT_CONFIDENCE`: readiness threshold for located elements - default: "0.6"
//!
//! # Example
//!
//! ```no_run
//! use casewright::CasewrightConfig;
//!
//! let config = CasewrightConfig::default();
//! config.validate().expect("invalid configuration");
//! println!("{}", config);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_LOCATOR_ENDPOINT: &str = "http://localhost:8000";
const DEFAULT_LOCATOR_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MIN_PARSE_CONFIDENCE: f64 = 0.5;
const DEFAULT_MIN_INTENT_CONFIDENCE: f64 = 0.4;
const DEFAULT_MIN_ELEMENT_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Minimum per-stage confidences for a run to be reported as ready for
/// script generation. They never stop the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessThresholds {
    pub parse: f64,
    pub intent: f64,
    pub element: f64,
}

impl Default for ReadinessThresholds {
    fn default() -> Self {
        Self {
            parse: DEFAULT_MIN_PARSE_CONFIDENCE,
            intent: DEFAULT_MIN_INTENT_CONFIDENCE,
            element: DEFAULT_MIN_ELEMENT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CasewrightConfig {
    /// Base URL of the element location service
    pub locator_endpoint: String,

    /// Per-request timeout for the element location service, in seconds
    pub locator_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Optional JSONL file for heuristic stage records
    pub heuristic_log: Option<PathBuf>,

    pub readiness: ReadinessThresholds,
}

fn env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                var = key,
                value = %raw,
                default = %default,
                "ignoring unparseable environment value"
            );
            default
        }
    }
}

impl Default for CasewrightConfig {
    /// Loads `CASEWRIGHT_*` variables, falling back to defaults for anything
    /// missing or unparseable.
    fn default() -> Self {
        let locator_endpoint = env::var("CASEWRIGHT_LOCATOR_ENDPOINT")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATOR_ENDPOINT.to_string());

        let locator_timeout_secs =
            env_parsed("CASEWRIGHT_LOCATOR_TIMEOUT", DEFAULT_LOCATOR_TIMEOUT_SECS);

        let log_level = env::var("CASEWRIGHT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let heuristic_log = env::var("CASEWRIGHT_HEURISTIC_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let readiness = ReadinessThresholds {
            parse: env_parsed(
                "CASEWRIGHT_MIN_PARSE_CONFIDENCE",
                DEFAULT_MIN_PARSE_CONFIDENCE,
            ),
            intent: env_parsed(
                "CASEWRIGHT_MIN_INTENT_CONFIDENCE",
                DEFAULT_MIN_INTENT_CONFIDENCE,
            ),
            element: env_parsed(
                "CASEWRIGHT_MIN_ELEMENT_CONFIDENCE",
                DEFAULT_MIN_ELEMENT_CONFIDENCE,
            ),
        };

        Self {
            locator_endpoint,
            locator_timeout_secs,
            log_level,
            heuristic_log,
            readiness,
        }
    }
}

impl CasewrightConfig {
    /// Checks that:
    /// - the locator endpoint is an http(s) URL
    /// - the timeout is between 1 second and 10 minutes
    /// - the log level is known
    /// - every readiness threshold lies in `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.locator_endpoint.starts_with("http://")
            || self.locator_endpoint.starts_with("https://"))
        {
            return Err(ConfigError::ParseError {
                field: "locator_endpoint".to_string(),
                error: format!("expected an http(s) URL, got '{}'", self.locator_endpoint),
            });
        }

        if self.locator_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Locator timeout must be at least 1 second".to_string(),
            ));
        }
        if self.locator_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Locator timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        let thresholds = [
            ("parse", self.readiness.parse),
            ("intent", self.readiness.intent),
            ("element", self.readiness.element),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Readiness threshold '{}' must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn locator_timeout(&self) -> Duration {
        Duration::from_secs(self.locator_timeout_secs)
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("locator_endpoint".to_string(), self.locator_endpoint.clone());
        map.insert(
            "locator_timeout_secs".to_string(),
            self.locator_timeout_secs.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        if let Some(ref path) = self.heuristic_log {
            map.insert("heuristic_log".to_string(), path.display().to_string());
        }
        map.insert(
            "min_parse_confidence".to_string(),
            self.readiness.parse.to_string(),
        );
        map.insert(
            "min_intent_confidence".to_string(),
            self.readiness.intent.to_string(),
        );
        map.insert(
            "min_element_confidence".to_string(),
            self.readiness.element.to_string(),
        );

        map
    }
}

impl fmt::Display for CasewrightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Casewright Configuration:")?;
        writeln!(f, "  Locator Endpoint: {}", self.locator_endpoint)?;
        writeln!(f, "  Locator Timeout: {}s", self.locator_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        if let Some(ref path) = self.heuristic_log {
            writeln!(f, "  Heuristic Log: {}", path.display())?;
        }
        writeln!(
            f,
            "  Readiness: parse>={} intent>={} element>={}",
            self.readiness.parse, self.readiness.intent, self.readiness.element
        )?;
        Ok(())
    }
}
