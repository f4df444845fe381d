//! Per-stage diagnostic log

mod logger;

pub use logger::HeuristicLogger;
