//! Shared utilities: logging setup and small text helpers

pub mod logging;
pub mod text;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
