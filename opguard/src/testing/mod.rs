//! Testing utilities for guarded operations.
//!
//! This module provides:
//! - A logger that records every diagnostic
//! - Scripted operation factories that fail on demand
//! - Assertions over recorded logs

mod assertions;
mod logger;
mod operations;

pub use assertions::{assert_log_count, assert_logged, assert_not_logged};
pub use logger::{LogRecord, RecordingLogger};
pub use operations::ScriptedOperation;
