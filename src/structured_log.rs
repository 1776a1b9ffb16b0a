//! Structured Logging - JSON-formatted events for machine parsing
//!
//! Usage:
//!   use crate::structured_log::{log_event, LogLevel};
//!
//!   log_event(LogLevel::Info, "RESOLVER", "layer1_hit", json!({
//!       "input": "ls",
//!       "command": "ls -l"
//!   }));
//!
//! Output (one JSON object per line, to stderr by default):
//!   {"timestamp":"2026-08-07T12:34:56Z","level":"info","component":"RESOLVER","event":"layer1_hit","data":{...}}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref SINK: Mutex<LogSink> = Mutex::new(LogSink::Stderr);
    static ref MIN_LEVEL: Mutex<LogLevel> = Mutex::new(LogLevel::Info);
}

enum LogSink {
    Stderr,
    File(File),
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub component: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Route log output to a file (append mode).
pub fn log_to_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    *SINK.lock().unwrap() = LogSink::File(file);
    Ok(())
}

/// Suppress log output entirely (used by tests and the REPL).
pub fn log_silent() {
    *SINK.lock().unwrap() = LogSink::Silent;
}

/// Route log output back to stderr.
pub fn log_to_stderr() {
    *SINK.lock().unwrap() = LogSink::Stderr;
}

/// Drop events below this level.
pub fn set_min_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

/// Emit one structured event.
pub fn log_event(level: LogLevel, component: &str, event: &str, data: serde_json::Value) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }

    let timestamp: DateTime<Utc> = Utc::now();
    let entry = LogEntry {
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        level: level.as_str().to_string(),
        component: component.to_string(),
        event: event.to_string(),
        data: if data.is_null() { None } else { Some(data) },
    };

    let Ok(line) = serde_json::to_string(&entry) else {
        return;
    };

    let mut sink = SINK.lock().unwrap();
    match &mut *sink {
        LogSink::Stderr => {
            let _ = writeln!(std::io::stderr(), "{}", line);
        }
        LogSink::File(file) => {
            let _ = writeln!(file, "{}", line);
        }
        LogSink::Silent => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serializes_without_null_data() {
        let entry = LogEntry {
            timestamp: "2026-08-07T00:00:00Z".to_string(),
            level: "info".to_string(),
            component: "RESOLVER".to_string(),
            event: "layer1_hit".to_string(),
            data: None,
        };
        let line = serde_json::to_string(&entry).unwrap();
        assert!(!line.contains("\"data\""));
    }

    // Sink and level state are process-global, so the file-sink behaviors
    // are exercised in a single sequential test.
    #[test]
    fn test_file_sink_and_level_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("events.log");
        log_to_file(&path).unwrap();

        log_event(
            LogLevel::Warn,
            "GATE",
            "blocked",
            json!({"rule": "recursive delete"}),
        );
        set_min_level(LogLevel::Error);
        log_event(LogLevel::Debug, "TEST", "dropped", serde_json::Value::Null);
        set_min_level(LogLevel::Info);
        log_to_stderr();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("dropped"));
        let blocked = content
            .lines()
            .filter_map(|l| serde_json::from_str::<LogEntry>(l).ok())
            .find(|e| e.component == "GATE")
            .unwrap();
        assert_eq!(blocked.event, "blocked");
        assert_eq!(blocked.level, "warn");
    }
}
