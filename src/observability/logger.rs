//! Structured JSON logger
//!
//! One log line = one event. `event` and `severity` are emitted first,
//! remaining fields follow in sorted key order so identical events produce
//! identical lines apart from the timestamp. Synchronous, no buffering.

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON-line logger
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, Value)]) {
        Self::write_line(severity, event, fields, &mut io::stdout());
    }

    /// Log to stderr (for failures)
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, Value)]) {
        Self::write_line(severity, event, fields, &mut io::stderr());
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, Value)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, Value)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, Value)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, Value)]) {
        Self::log_stderr(Severity::Error, event, fields);
    }

    /// Internal implementation writing one line to the given writer
    fn write_line<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, Value)],
        writer: &mut W,
    ) {
        let mut line = String::with_capacity(128);

        // event and severity lead every line; escaping is serde_json's job
        line.push_str("{\"event\":");
        line.push_str(&Value::String(event.to_string()).to_string());
        line.push_str(",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push_str("\",\"ts\":\"");
        line.push_str(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        line.push('"');

        // Remaining fields in sorted key order
        let mut sorted: Vec<&(&str, Value)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        for (key, value) in sorted {
            line.push(',');
            line.push_str(&Value::String((*key).to_string()).to_string());
            line.push(':');
            line.push_str(&value.to_string());
        }

        line.push_str("}\n");

        // One write, one flush
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Capture a log line to a string for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, Value)]) -> String {
    let mut buffer = Vec::new();
    Logger::write_line(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
