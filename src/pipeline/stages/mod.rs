//! The three heuristic stages, in execution order

pub mod intent;
pub mod parse;
pub mod platform;

pub use intent::IntentStage;
pub use parse::ParseStage;
pub use platform::PlatformStage;
