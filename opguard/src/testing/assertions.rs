//! Test assertions for recorded diagnostics.

use super::RecordingLogger;
use crate::logging::LogLevel;

/// Asserts that a record at `level` contains `needle`.
pub fn assert_logged(logger: &RecordingLogger, level: LogLevel, needle: &str) {
    assert!(
        logger.contains(level, needle),
        "Expected a {level} record containing '{needle}', got: {:?}",
        logger.records()
    );
}

/// Asserts that no record at `level` contains `needle`.
pub fn assert_not_logged(logger: &RecordingLogger, level: LogLevel, needle: &str) {
    assert!(
        !logger.contains(level, needle),
        "Expected no {level} record containing '{needle}', got: {:?}",
        logger.records()
    );
}

/// Asserts the number of records at `level`.
pub fn assert_log_count(logger: &RecordingLogger, level: LogLevel, expected: usize) {
    let actual = logger.count(level);
    assert_eq!(
        actual, expected,
        "Expected {expected} {level} records, got {actual}: {:?}",
        logger.messages(level)
    );
}
