//! Guard configuration.
//!
//! Every value has a default matching the guards' documented defaults, so an
//! empty JSON object or an empty environment yields a usable config.

mod loader;

pub use loader::{ENV_LABEL, ENV_MAX_RETRIES, ENV_RETRY_DELAY_MS, ENV_TIMEOUT_MS};

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a single operation.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default attempt budget, including the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for linear backoff.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Label used when the caller does not name the operation.
pub const DEFAULT_OPERATION_LABEL: &str = "Database operation";

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_label() -> String {
    DEFAULT_OPERATION_LABEL.to_string()
}

/// Configuration for the timeout guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Creates a new timeout config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the deadline as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid_value("timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

/// Configuration for the retry guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for linear backoff in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempt budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub const fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Attempt budget actually used; zero still runs the operation once.
    #[must_use]
    pub const fn effective_attempts(&self) -> u32 {
        if self.max_retries == 0 {
            1
        } else {
            self.max_retries
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Linear: `delay_ms * attempt`.
    #[must_use]
    pub fn delay_before(&self, failed_attempt: u32) -> Duration {
        Duration::from_millis(self.delay_ms.saturating_mul(u64::from(failed_attempt)))
    }

    /// The full sequence of inter-attempt delays.
    #[must_use]
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        (1..self.effective_attempts())
            .map(|attempt| self.delay_before(attempt))
            .collect()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::invalid_value("max_retries", "must be at least 1"));
        }
        Ok(())
    }
}

/// Combined configuration for [`OperationGuard`](crate::guards::OperationGuard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Default label for operations run without one.
    #[serde(default = "default_label")]
    pub label: String,
    /// Per-attempt deadline.
    #[serde(default)]
    pub timeout: TimeoutConfig,
    /// Retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            timeout: TimeoutConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl GuardConfig {
    /// Creates a new guard config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the timeout config.
    #[must_use]
    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry config.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::invalid_value("label", "must not be empty"));
        }
        self.timeout.validate()?;
        self.retry.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.label, "Database operation");
        assert_eq!(config.timeout.timeout_ms, 10_000);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.delay_ms, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = GuardConfig::new()
            .with_label("Feed pet")
            .with_timeout(TimeoutConfig::new().with_timeout_ms(2_500))
            .with_retry(RetryConfig::new().with_max_retries(5).with_delay_ms(50));

        assert_eq!(config.label, "Feed pet");
        assert_eq!(config.timeout.timeout(), Duration::from_millis(2_500));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.delay_ms, 50);
    }

    #[test]
    fn test_linear_backoff_schedule() {
        let retry = RetryConfig::new().with_max_retries(4).with_delay_ms(100);
        assert_eq!(
            retry.backoff_schedule(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(300),
            ]
        );
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let retry = RetryConfig::new().with_delay_ms(u64::MAX / 2);
        assert_eq!(retry.delay_before(1), Duration::from_millis(u64::MAX / 2));
        assert_eq!(retry.delay_before(3), Duration::from_millis(u64::MAX));
        assert_eq!(
            RetryConfig::new().with_delay_ms(250).delay_before(u32::MAX),
            Duration::from_millis(250 * u64::from(u32::MAX))
        );
    }

    #[test]
    fn test_single_attempt_has_no_backoff() {
        assert!(RetryConfig::new().with_max_retries(1).backoff_schedule().is_empty());
        assert!(RetryConfig::new().with_max_retries(0).backoff_schedule().is_empty());
        assert_eq!(RetryConfig::new().with_max_retries(0).effective_attempts(), 1);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(TimeoutConfig::new().with_timeout_ms(0).validate().is_err());
        assert!(RetryConfig::new().with_max_retries(0).validate().is_err());
        assert!(GuardConfig::new().with_label("  ").validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GuardConfig =
            serde_json::from_str(r#"{"retry": {"max_retries": 5}}"#).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.delay_ms, 1_000);
        assert_eq!(config.timeout.timeout_ms, 10_000);
        assert_eq!(config.label, "Database operation");
    }
}
