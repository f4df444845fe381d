//! casewright - heuristic analysis of manual test cases for UI automation
//!
//! This library turns freeform or semi-structured manual test descriptions
//! into a confidence-scored semantic model: a normalized test case, the UI
//! intents behind each step, and the enterprise platform the test targets.
//! Downstream tooling uses the result to locate elements and generate scripts.
//!
//! # Core Concepts
//!
//! - **Parsing**: format classification followed by per-format structural
//!   parsing (plain text, Gherkin, JSON, CSV, spreadsheet and document rows)
//! - **Intents**: rule-based detectors that tag each step with the actions and
//!   element kinds it implies
//! - **Platform detection**: weighted evidence scoring against a static
//!   registry of platform profiles
//!
//! # Example Usage
//!
//! ```
//! use casewright::{Pipeline, PipelineInput};
//!
//! let report = Pipeline::new().run(PipelineInput::new(
//!     "Step 1: Navigate to https://login.salesforce.com\n\
//!      Step 2: Enter username test@x.com\n\
//!      Step 3: Click Login button",
//! ));
//!
//! assert_eq!(report.test_case.steps.len(), 3);
//! assert!(report.platform.platform_id.starts_with("salesforce"));
//! ```
//!
//! # Project Structure
//!
//! - [`input`] and [`parser`]: classification and structural parsing
//! - [`intent`]: semantic intent extraction
//! - [`platform`]: evidence collection, scoring and selection
//! - [`pipeline`]: stage composition and the run report
//! - [`locator`]: client for the external element-location engine

pub mod config;
pub mod error;
pub mod heuristics;
pub mod input;
pub mod intent;
pub mod locator;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod platform;
pub mod progress;
pub mod util;

pub use config::{CasewrightConfig, ConfigError, ReadinessThresholds};
pub use error::PipelineError;
pub use input::{classify, InputFormat, RawInput};
pub use intent::{ElementKind, EnrichedStep, IntentType, SemanticIntent};
pub use locator::{ElementLocation, ElementLocator, HttpElementLocator, LocatorRequest};
pub use model::{ActionKind, Step, TestCase, TestData};
pub use parser::{DocumentReader, ExtractedDocument, ParseMethod, ParseOutcome};
pub use pipeline::{InputMetadata, Pipeline, PipelineInput, PipelineReport};
pub use platform::{PlatformDetectionResult, PlatformRegistry};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
