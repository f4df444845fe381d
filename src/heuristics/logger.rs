// Heuristic logging for pipeline stages
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Serialize)]
struct HeuristicEntry<'a, I, O>
where
    I: Serialize,
    O: Serialize,
{
    stage: &'a str,
    #[serde(serialize_with = "serialize_as_json")]
    input: &'a I,
    #[serde(serialize_with = "serialize_as_json")]
    output: &'a O,
    latency_ms: u64,
    timestamp: String,
}

fn serialize_as_json<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let json_string = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&json_string)
}

/// Appends one JSON line per stage execution; disabled unless given a path
#[derive(Clone, Default)]
pub struct HeuristicLogger {
    writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl HeuristicLogger {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let writer = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(Arc::new(Mutex::new(BufWriter::new(file)))),
                Err(e) => {
                    warn!("Failed to open heuristic log file {:?}: {}", path, e);
                    None
                }
            }
        });

        Self { writer }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn log_stage<I, O>(&self, stage: &str, input: &I, output: &O, latency_ms: u64)
    where
        I: Serialize,
        O: Serialize,
    {
        let Some(writer) = &self.writer else {
            return;
        };

        let entry = HeuristicEntry {
            stage,
            input,
            output,
            latency_ms,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize heuristic entry for stage {}: {}", stage, e);
                return;
            }
        };

        match writer.lock() {
            Ok(mut writer) => {
                if let Err(e) = writeln!(writer, "{}", json) {
                    warn!("Failed to write heuristic log entry: {}", e);
                }
                if let Err(e) = writer.flush() {
                    warn!("Failed to flush heuristic log: {}", e);
                }
            }
            Err(_) => warn!("Heuristic log writer poisoned; entry dropped"),
        }

        debug!(stage, latency_ms, "heuristic log entry written");
    }
}

impl std::fmt::Debug for HeuristicLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicLogger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_line_per_stage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("heuristics.jsonl");
        let logger = HeuristicLogger::new(Some(path.clone()));
        assert!(logger.is_enabled());

        logger.log_stage("Parsing", &json!({"len": 12}), &json!({"steps": 3}), 4);
        logger.log_stage("Intent extraction", &json!({"steps": 3}), &json!({"intents": 4}), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["stage"], "Parsing");
        assert_eq!(first["latency_ms"], 4);
        // Payloads are stored as embedded JSON strings
        assert_eq!(first["input"], r#"{"len":12}"#);
        assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_disabled_is_noop() {
        let logger = HeuristicLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_stage("Parsing", &1, &2, 0);
    }

    #[test]
    fn test_unopenable_path_disables() {
        let dir = TempDir::new().unwrap();
        let logger = HeuristicLogger::new(Some(dir.path().join("missing").join("log.jsonl")));
        assert!(!logger.is_enabled());
    }
}
