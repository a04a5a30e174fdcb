//! Timeout guard.
//!
//! The operation is spawned onto the runtime when the guard is entered and
//! raced against a timer. The first to settle wins. A timed-out operation is
//! not cancelled: its task keeps running and is handed to a detached reaper
//! that discards a late success and logs a late failure.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::resolve_label;
use crate::config::TimeoutConfig;
use crate::errors::{GuardError, GuardResult};
use crate::logging::{GuardLogger, TracingLogger};

/// Races operations against a deadline.
#[derive(Clone)]
pub struct TimeoutGuard {
    config: TimeoutConfig,
    logger: Arc<dyn GuardLogger>,
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(TimeoutConfig::default())
    }
}

impl std::fmt::Debug for TimeoutGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutGuard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TimeoutGuard {
    /// Creates a guard that logs through `tracing`.
    #[must_use]
    pub fn new(config: TimeoutConfig) -> Self {
        Self {
            config,
            logger: TracingLogger::shared(),
        }
    }

    /// Replaces the logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn GuardLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TimeoutConfig {
        &self.config
    }

    /// Runs `operation` under the configured deadline.
    ///
    /// Returns the operation's value unchanged if it settles first,
    /// [`GuardError::Operation`] if it fails first, and
    /// [`GuardError::Timeout`] if the deadline elapses first. An empty
    /// `label` falls back to `"Database operation"`.
    pub async fn run<T, E, F>(&self, operation: F, label: &str) -> GuardResult<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let label = resolve_label(label);
        let timeout_ms = self.config.timeout_ms;
        let span = tracing::debug_span!(
            "timeout_guard",
            operation = label,
            timeout_ms,
            call_id = %Uuid::new_v4(),
        );

        async move {
            let mut handle = tokio::spawn(operation);

            let settled = tokio::select! {
                biased;
                joined = &mut handle => Some(joined),
                () = tokio::time::sleep(self.config.timeout()) => None,
            };

            match settled {
                Some(Ok(Ok(value))) => Ok(value),
                Some(Ok(Err(error))) => Err(GuardError::Operation(error)),
                Some(Err(join_error)) => Err(GuardError::aborted(label, join_error.to_string())),
                None => {
                    let error = GuardError::timeout(label, timeout_ms);
                    self.logger.error(label, &error.to_string());
                    abandon(handle, label.to_string(), Arc::clone(&self.logger));
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Detaches a timed-out operation, observing how it eventually settles.
fn abandon<T, E>(handle: JoinHandle<Result<T, E>>, label: String, logger: Arc<dyn GuardLogger>)
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        match handle.await {
            Ok(Ok(_)) => {
                tracing::debug!(operation = %label, "Operation completed after timeout; result discarded");
            }
            Ok(Err(error)) => {
                logger.warn(&label, &format!("{label} failed after timing out: {error}"));
            }
            Err(join_error) => {
                logger.warn(&label, &format!("{label} aborted after timing out: {join_error}"));
            }
        }
    });
}

/// Races `operation` against a `timeout_ms` deadline.
///
/// Uses [`TracingLogger`]; build a [`TimeoutGuard`] to inject another logger.
pub async fn with_timeout<T, E, F>(operation: F, timeout_ms: u64, label: &str) -> GuardResult<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    TimeoutGuard::new(TimeoutConfig::new().with_timeout_ms(timeout_ms))
        .run(operation, label)
        .await
}
