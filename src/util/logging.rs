//! Structured logging setup for casewright
//!
//! Pipeline stages emit `tracing` events with structured fields (`stage`,
//! `confidence`, `elapsed_ms`). This module wires those events to a console or
//! JSON subscriber. Initialization happens at most once per process.
//!
//! # Example
//!
//! ```no_run
//! use casewright::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(stage = "parse", "pipeline stage started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the minimum log level
pub const LOG_LEVEL_ENV: &str = "CASEWRIGHT_LOG_LEVEL";

/// Environment variable toggling JSON output
pub const LOG_JSON_ENV: &str = "CASEWRIGHT_LOG_JSON";

static INIT: Once = Once::new();

/// Controls the subscriber installed by [`init_logging`]
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for events emitted by this crate
    pub level: Level,

    /// Emit one JSON object per event instead of console lines
    pub use_json: bool,

    /// Include the module target (e.g. `casewright::platform`)
    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,

    /// Include thread id and name
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata, for batch runs whose logs are collected
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    /// Console output at debug level, useful when tuning heuristics
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            ..Default::default()
        }
    }

    /// Reads `CASEWRIGHT_LOG_LEVEL` and `CASEWRIGHT_LOG_JSON`, keeping defaults for
    /// anything missing or unparseable.
    pub fn from_env() -> Self {
        let level = env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var(LOG_JSON_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a level name case-insensitively.
///
/// ```
/// use casewright::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Some(Level::DEBUG));
/// assert_eq!(parse_level("verbose"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let default_directive = format!("casewright={}", level);
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_directive));

    if env::var("RUST_LOG").is_err() {
        for directive in ["hyper=warn", "reqwest=warn", "h2=warn"] {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    filter
}

/// Installs the global subscriber. Later calls are ignored, as is a subscriber
/// already installed by the host application.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "tracing subscriber already installed");
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
