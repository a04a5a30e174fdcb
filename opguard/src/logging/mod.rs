//! Logging for the guards.
//!
//! The guards never call a global logger directly. They hold an
//! `Arc<dyn GuardLogger>`, which defaults to [`TracingLogger`], so tests can
//! substitute a recording or mock logger without touching global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Severity of a guard diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational.
    Info,
    /// A retry or a late failure.
    Warn,
    /// A timeout or an exhausted retry budget.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Sink for guard diagnostics.
#[cfg_attr(test, mockall::automock)]
pub trait GuardLogger: Send + Sync {
    /// Logs an informational message.
    fn info(&self, operation: &str, message: &str);

    /// Logs a warning.
    fn warn(&self, operation: &str, message: &str);

    /// Logs an error.
    fn error(&self, operation: &str, message: &str);

    /// Logs at the given level.
    fn log(&self, level: LogLevel, operation: &str, message: &str) {
        match level {
            LogLevel::Info => self.info(operation, message),
            LogLevel::Warn => self.warn(operation, message),
            LogLevel::Error => self.error(operation, message),
        }
    }
}

/// A logger that forwards to the `tracing` framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Returns the logger as a shared trait object.
    #[must_use]
    pub fn shared() -> Arc<dyn GuardLogger> {
        Arc::new(Self)
    }
}

impl GuardLogger for TracingLogger {
    fn info(&self, operation: &str, message: &str) {
        tracing::info!(operation, "{message}");
    }

    fn warn(&self, operation: &str, message: &str) {
        tracing::warn!(operation, "{message}");
    }

    fn error(&self, operation: &str, message: &str) {
        tracing::error!(operation, "{message}");
    }
}

/// A logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl GuardLogger for NoOpLogger {
    fn info(&self, _operation: &str, _message: &str) {}
    fn warn(&self, _operation: &str, _message: &str) {}
    fn error(&self, _operation: &str, _message: &str) {}
}

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid. Returns false
/// if a global subscriber was already installed.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
