//! Combined guard: a deadline on every attempt, retries across attempts.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use super::{RetryGuard, TimeoutGuard};
use crate::config::GuardConfig;
use crate::errors::{ConfigError, GuardResult};
use crate::logging::{GuardLogger, TracingLogger};

/// Applies [`TimeoutGuard`] to each attempt driven by [`RetryGuard`].
///
/// A timed-out attempt counts as a transient failure and is retried.
#[derive(Debug, Clone)]
pub struct OperationGuard {
    config: GuardConfig,
    timeout: TimeoutGuard,
    retry: RetryGuard,
}

impl Default for OperationGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl OperationGuard {
    /// Creates a guard that logs through `tracing`.
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        let logger = TracingLogger::shared();
        Self {
            timeout: TimeoutGuard::new(config.timeout).with_logger(Arc::clone(&logger)),
            retry: RetryGuard::new(config.retry).with_logger(logger),
            config,
        }
    }

    /// Creates a guard from `OPGUARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(GuardConfig::from_env()?))
    }

    /// Replaces the logger used by both inner guards.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn GuardLogger>) -> Self {
        self.timeout = self.timeout.with_logger(Arc::clone(&logger));
        self.retry = self.retry.with_logger(logger);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns the per-attempt timeout guard.
    #[must_use]
    pub const fn timeout_guard(&self) -> &TimeoutGuard {
        &self.timeout
    }

    /// Returns the retry guard.
    #[must_use]
    pub const fn retry_guard(&self) -> &RetryGuard {
        &self.retry
    }

    /// Runs fresh attempts from `factory`, each under the deadline.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut factory: F) -> GuardResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let timeout = &self.timeout;
        self.retry
            .run_guarded(|| timeout.run(factory(), label), label)
            .await
    }

    /// Like [`run`](Self::run), labelled with the configured default.
    pub async fn run_unlabelled<T, E, F, Fut>(&self, factory: F) -> GuardResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.run(&self.config.label, factory).await
    }
}
