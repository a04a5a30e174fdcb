//! Retry guard with linear backoff.
//!
//! Attempts are strictly sequential. The delay after failed attempt `n` is
//! `delay_ms * n`. Business rejections (see [`crate::classify`]) end the
//! loop immediately without consuming the remaining budget.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use futures::TryFutureExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::classify::FailureClass;
use super::resolve_label;
use crate::config::RetryConfig;
use crate::errors::{GuardError, GuardResult};
use crate::logging::{GuardLogger, TracingLogger};

/// Re-invokes an operation factory until it succeeds or the budget runs out.
#[derive(Clone)]
pub struct RetryGuard {
    config: RetryConfig,
    logger: Arc<dyn GuardLogger>,
}

impl Default for RetryGuard {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl std::fmt::Debug for RetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryGuard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RetryGuard {
    /// Creates a guard that logs through `tracing`.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
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
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs a fresh attempt from `factory` until one succeeds.
    ///
    /// Fails with [`GuardError::NonRetryable`] as soon as a business
    /// rejection is seen, or [`GuardError::RetryExhausted`] once every
    /// attempt has failed. An empty `label` falls back to
    /// `"Database operation"`.
    pub async fn run<T, E, F, Fut>(&self, mut factory: F, label: &str) -> GuardResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_guarded(|| factory().map_err(GuardError::Operation), label)
            .await
    }

    /// Like [`run`](Self::run), for attempts that already return guard errors.
    ///
    /// Use this to retry a [`TimeoutGuard`](super::TimeoutGuard) call: its
    /// [`GuardError::Timeout`] is classified by variant and stays retryable,
    /// whereas [`run`](Self::run) would wrap it as an opaque operation error
    /// and classify it by its message, which includes the label.
    pub async fn run_guarded<T, E, F, Fut>(
        &self,
        mut attempt: F,
        label: &str,
    ) -> GuardResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GuardResult<T, E>>,
        E: Display,
    {
        let label = resolve_label(label);
        let max_attempts = self.config.effective_attempts();
        let span = tracing::debug_span!(
            "retry_guard",
            operation = label,
            max_attempts,
            call_id = %Uuid::new_v4(),
        );

        async move {
            let mut attempt_number = 1;

            loop {
                let error = match attempt().await {
                    Ok(value) => return Ok(value),
                    Err(error) => error,
                };

                if let FailureClass::NonRetryable(reason) = error.classify() {
                    tracing::debug!(attempt = attempt_number, %reason, "Non-retryable failure");
                    return Err(GuardError::NonRetryable {
                        operation: label.to_string(),
                        reason,
                        cause: Box::new(error),
                    });
                }

                if attempt_number >= max_attempts {
                    let exhausted = GuardError::RetryExhausted {
                        operation: label.to_string(),
                        attempts: attempt_number,
                        cause: Box::new(error),
                    };
                    self.logger.error(label, &exhausted.to_string());
                    return Err(exhausted);
                }

                let delay = self.config.delay_before(attempt_number);
                self.logger.warn(
                    label,
                    &format!(
                        "{label} attempt {attempt_number}/{max_attempts} failed, retrying in {}ms: {error}",
                        delay.as_millis()
                    ),
                );
                tokio::time::sleep(delay).await;
                attempt_number += 1;
            }
        }
        .instrument(span)
        .await
    }
}

/// Runs `factory` up to `max_retries` times with `delay_ms` linear backoff.
///
/// Uses [`TracingLogger`]; build a [`RetryGuard`] to inject another logger.
/// Errors from `factory` are classified by their message, so to retry a
/// [`with_timeout`](super::with_timeout) call use [`with_retry_guarded`].
pub async fn with_retry<T, E, F, Fut>(
    factory: F,
    max_retries: u32,
    delay_ms: u64,
    label: &str,
) -> GuardResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryGuard::new(
        RetryConfig::new()
            .with_max_retries(max_retries)
            .with_delay_ms(delay_ms),
    )
    .run(factory, label)
    .await
}

/// Runs guarded attempts from `attempt` up to `max_retries` times.
///
/// Composes with [`with_timeout`](super::with_timeout): a timed-out attempt
/// is retried even when the label contains a rejection marker.
pub async fn with_retry_guarded<T, E, F, Fut>(
    attempt: F,
    max_retries: u32,
    delay_ms: u64,
    label: &str,
) -> GuardResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GuardResult<T, E>>,
    E: Display,
{
    RetryGuard::new(
        RetryConfig::new()
            .with_max_retries(max_retries)
            .with_delay_ms(delay_ms),
    )
    .run_guarded(attempt, label)
    .await
}
