//! Recording logger.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::logging::{GuardLogger, LogLevel};

/// A single captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// Label of the operation being guarded.
    pub operation: String,
    /// Rendered message.
    pub message: String,
    /// When the record was captured.
    pub recorded_at: DateTime<Utc>,
}

/// A logger that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    /// Creates an empty recording logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, operation: &str, message: &str) {
        self.records.lock().push(LogRecord {
            level,
            operation: operation.to_string(),
            message: message.to_string(),
            recorded_at: Utc::now(),
        });
    }

    /// Returns all records captured so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Returns the messages logged at a level.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Number of records at a level.
    #[must_use]
    pub fn count(&self, level: LogLevel) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }

    /// Returns true if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Returns true if a record at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    /// Clears all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Waits until at least `count` records exist at `level`.
    ///
    /// Returns false if `timeout` elapses first. Used for diagnostics that
    /// are emitted from detached tasks.
    pub async fn wait_for(&self, level: LogLevel, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count(level) >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl GuardLogger for RecordingLogger {
    fn info(&self, operation: &str, message: &str) {
        self.push(LogLevel::Info, operation, message);
    }

    fn warn(&self, operation: &str, message: &str) {
        self.push(LogLevel::Warn, operation, message);
    }

    fn error(&self, operation: &str, message: &str) {
        self.push(LogLevel::Error, operation, message);
    }
}
