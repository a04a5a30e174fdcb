//! Failure classification.
//!
//! A failure is non-retryable when its message names a business rejection:
//! a missing row, a permission or auth failure, or a uniqueness violation.
//! Retrying those cannot change the outcome. Everything else is treated as
//! a transient infrastructure fault.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Business rejection detected in a failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonRetryableReason {
    /// The requested row or resource does not exist.
    NotFound,
    /// The caller lacks the rights for the operation.
    Permission,
    /// The caller is not authenticated.
    Unauthorized,
    /// The write duplicates an existing record.
    Duplicate,
    /// The write violates a unique constraint.
    Unique,
}

impl NonRetryableReason {
    /// Every reason, in match priority order.
    pub const ALL: [Self; 5] = [
        Self::NotFound,
        Self::Permission,
        Self::Unauthorized,
        Self::Duplicate,
        Self::Unique,
    ];

    /// The canonical marker text for this reason.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Permission => "permission",
            Self::Unauthorized => "unauthorized",
            Self::Duplicate => "duplicate",
            Self::Unique => "unique",
        }
    }

    fn from_matched(text: &str) -> Option<Self> {
        let lowered = text.to_ascii_lowercase();
        if lowered.starts_with("not") {
            return Some(Self::NotFound);
        }
        Self::ALL
            .into_iter()
            .find(|reason| reason.marker() == lowered)
    }
}

impl fmt::Display for NonRetryableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Outcome of classifying a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureClass {
    /// Transient; another attempt may succeed.
    Retryable,
    /// Business rejection; propagate immediately.
    NonRetryable(NonRetryableReason),
}

impl FailureClass {
    /// Returns true if another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(self) -> Option<NonRetryableReason> {
        match self {
            Self::Retryable => None,
            Self::NonRetryable(reason) => Some(reason),
        }
    }
}

#[allow(clippy::expect_used)]
fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)not[ _-]found|permission|unauthorized|duplicate|unique")
            .expect("marker pattern is a valid regex")
    })
}

/// Classifies a failure by its message.
///
/// Matching is case-insensitive. "not found" also matches the hyphenated
/// and underscored spellings used in error codes.
///
/// # Examples
///
/// ```
/// use opguard::classify::{classify_message, FailureClass, NonRetryableReason};
///
/// assert_eq!(
///     classify_message("JWT expired: Unauthorized"),
///     FailureClass::NonRetryable(NonRetryableReason::Unauthorized),
/// );
/// assert_eq!(classify_message("connection reset by peer"), FailureClass::Retryable);
/// ```
#[must_use]
pub fn classify_message(message: &str) -> FailureClass {
    marker_pattern()
        .find(message)
        .and_then(|m| NonRetryableReason::from_matched(m.as_str()))
        .map_or(FailureClass::Retryable, FailureClass::NonRetryable)
}
