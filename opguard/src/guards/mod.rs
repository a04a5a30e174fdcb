//! Reliability guards.
//!
//! This module provides:
//! - [`TimeoutGuard`] / [`with_timeout`]: deadline for an in-flight operation
//! - [`RetryGuard`] / [`with_retry`]: linear-backoff retries over a factory
//! - [`with_retry_guarded`]: retries over attempts that are already guarded,
//!   such as a [`with_timeout`] call
//! - [`OperationGuard`]: both, with the deadline applied per attempt
//!
//! The timeout guard spawns onto the tokio runtime, so it must be called
//! from within one.

mod operation;
mod retry;
mod timeout;

use crate::config::DEFAULT_OPERATION_LABEL;

pub use operation::OperationGuard;
pub use retry::{with_retry, with_retry_guarded, RetryGuard};
pub use timeout::{with_timeout, TimeoutGuard};

/// Substitutes the default label for an empty one.
fn resolve_label(label: &str) -> &str {
    if label.is_empty() {
        DEFAULT_OPERATION_LABEL
    } else {
        label
    }
}
