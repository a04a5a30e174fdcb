//! Error types for opguard.
//!
//! [`GuardError`] is generic over the wrapped operation's own error type so
//! the underlying cause is never stringified away: callers can always get
//! the operation's own error back with [`GuardError::into_operation_error`].

use crate::classify::{classify_message, FailureClass, NonRetryableReason};
use std::fmt;
use thiserror::Error;

/// Result alias for guarded operations.
pub type GuardResult<T, E> = Result<T, GuardError<E>>;

/// Failure of a guarded operation.
#[derive(Debug)]
pub enum GuardError<E> {
    /// The wrapped operation failed. Displays as the operation's own error.
    Operation(E),

    /// The deadline elapsed before the operation settled.
    Timeout {
        /// Label of the guarded operation.
        operation: String,
        /// The deadline budget in milliseconds.
        timeout_ms: u64,
    },

    /// The operation task panicked or was cancelled by the runtime.
    Aborted {
        /// Label of the guarded operation.
        operation: String,
        /// Description of the abort.
        message: String,
    },

    /// A business rejection that retrying cannot fix.
    ///
    /// Displays as the underlying failure, unchanged.
    NonRetryable {
        /// Label of the guarded operation.
        operation: String,
        /// The marker that matched.
        reason: NonRetryableReason,
        /// The underlying failure.
        cause: Box<GuardError<E>>,
    },

    /// Every attempt failed with a retryable error.
    RetryExhausted {
        /// Label of the guarded operation.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
        /// The failure of the last attempt.
        cause: Box<GuardError<E>>,
    },
}

impl<E> GuardError<E> {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an aborted error.
    #[must_use]
    pub fn aborted(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Aborted {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true for a deadline failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true for a business rejection.
    #[must_use]
    pub const fn is_non_retryable(&self) -> bool {
        matches!(self, Self::NonRetryable { .. })
    }

    /// Returns true when the retry budget was consumed.
    #[must_use]
    pub const fn is_retry_exhausted(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }

    /// Returns the operation label, if this error carries one.
    #[must_use]
    pub fn operation_label(&self) -> Option<&str> {
        match self {
            Self::Operation(_) => None,
            Self::Timeout { operation, .. }
            | Self::Aborted { operation, .. }
            | Self::NonRetryable { operation, .. }
            | Self::RetryExhausted { operation, .. } => Some(operation),
        }
    }

    /// Follows the cause chain down to the innermost failure.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::NonRetryable { cause, .. } | Self::RetryExhausted { cause, .. } => {
                cause.root_cause()
            }
            other => other,
        }
    }

    /// Returns the wrapped operation's error, if the root cause is one.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(error) => Some(error),
            Self::NonRetryable { cause, .. } | Self::RetryExhausted { cause, .. } => {
                cause.into_operation_error()
            }
            Self::Timeout { .. } | Self::Aborted { .. } => None,
        }
    }
}

impl<E: fmt::Display> GuardError<E> {
    /// Classifies this failure for the retry guard.
    ///
    /// Timeouts and aborts are transient regardless of the operation label.
    /// Operation errors are classified by their message.
    #[must_use]
    pub fn classify(&self) -> FailureClass {
        match self {
            Self::Operation(error) => classify_message(&error.to_string()),
            Self::Timeout { .. } | Self::Aborted { .. } => FailureClass::Retryable,
            Self::NonRetryable { reason, .. } => FailureClass::NonRetryable(*reason),
            Self::RetryExhausted { cause, .. } => cause.classify(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for GuardError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(error) => write!(f, "{error}"),
            Self::Timeout {
                operation,
                timeout_ms,
            } => write!(f, "{operation} timed out after {timeout_ms}ms"),
            Self::Aborted { operation, message } => {
                write!(f, "{operation} aborted: {message}")
            }
            Self::NonRetryable { cause, .. } => write!(f, "{cause}"),
            Self::RetryExhausted {
                operation,
                attempts,
                cause,
            } => write!(f, "{operation} failed after {attempts} attempts: {cause}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for GuardError<E> {}

impl<E> From<E> for GuardError<E> {
    fn from(error: E) -> Self {
        Self::Operation(error)
    }
}

/// Errors raised while loading or validating guard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("Invalid config value for {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An environment variable could not be parsed.
    #[error("Invalid environment variable {name}={value}: {message}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// Raw value.
        value: String,
        /// Parse failure.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn exhausted(message: &str) -> GuardError<String> {
        GuardError::RetryExhausted {
            operation: "Save pet".to_string(),
            attempts: 3,
            cause: Box::new(GuardError::Operation(message.to_string())),
        }
    }

    #[test]
    fn test_timeout_display_names_operation_and_budget() {
        let err: GuardError<String> = GuardError::timeout("Fetch pet", 10_000);
        assert_eq!(err.to_string(), "Fetch pet timed out after 10000ms");
        assert!(err.is_timeout());
        assert_eq!(err.operation_label(), Some("Fetch pet"));
    }

    #[test]
    fn test_non_retryable_displays_cause_unchanged() {
        let err = GuardError::NonRetryable {
            operation: "Load friends".to_string(),
            reason: NonRetryableReason::Permission,
            cause: Box::new(GuardError::Operation("permission denied".to_string())),
        };
        assert_eq!(err.to_string(), "permission denied");
        assert!(err.is_non_retryable());
        assert_eq!(
            err.classify(),
            FailureClass::NonRetryable(NonRetryableReason::Permission)
        );
    }

    #[test]
    fn test_exhausted_display_includes_attempts_and_last_message() {
        let err = exhausted("connection refused");
        assert_eq!(
            err.to_string(),
            "Save pet failed after 3 attempts: connection refused"
        );
        assert!(err.is_retry_exhausted());
    }

    #[test]
    fn test_root_cause_and_operation_error() {
        let err = exhausted("socket hang up");
        assert!(matches!(err.root_cause(), GuardError::Operation(m) if m == "socket hang up"));
        assert_eq!(err.into_operation_error(), Some("socket hang up".to_string()));

        let timeout: GuardError<String> = GuardError::timeout("x", 5);
        assert_eq!(timeout.into_operation_error(), None);
    }

    #[test]
    fn test_timeout_with_marker_in_label_stays_retryable() {
        let err: GuardError<String> = GuardError::timeout("Check unique pet name", 100);
        assert_eq!(err.classify(), FailureClass::Retryable);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid_value("timeout_ms", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for timeout_ms: must be positive"
        );
    }
}
