//! # Opguard
//!
//! Reliability guards for operations against a remote database backend.
//!
//! Opguard wraps arbitrary async operations with:
//!
//! - **Timeout guard**: races an in-flight operation against a deadline
//! - **Retry guard**: re-invokes an operation factory with linear backoff,
//!   giving up early on business rejections (not found, permission, ...)
//! - **Operation guard**: both at once, with a deadline on every attempt
//!
//! Diagnostics go through an injectable [`GuardLogger`](logging::GuardLogger)
//! which defaults to the `tracing` ecosystem.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use opguard::prelude::*;
//!
//! let pet = with_timeout(client.fetch_pet(pet_id), 5_000, "Fetch pet").await?;
//!
//! let saved = with_retry(|| client.save_pet(pet.clone()), 3, 1_000, "Save pet").await?;
//!
//! let free = with_retry_guarded(
//!     || with_timeout(client.name_taken(name.clone()), 2_000, "Check unique name"),
//!     3,
//!     500,
//!     "Check unique name",
//! )
//! .await?;
//!
//! let guard = OperationGuard::new(GuardConfig::from_env()?);
//! let friends = guard.run("Load friends", || client.friends(user_id)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod classify;
pub mod config;
pub mod errors;
pub mod guards;
pub mod logging;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{classify_message, FailureClass, NonRetryableReason};
    pub use crate::config::{GuardConfig, RetryConfig, TimeoutConfig};
    pub use crate::errors::{ConfigError, GuardError, GuardResult};
    pub use crate::guards::{
        with_retry, with_retry_guarded, with_timeout, OperationGuard, RetryGuard, TimeoutGuard,
    };
    pub use crate::logging::{
        init_tracing, GuardLogger, LogFormat, NoOpLogger, TracingLogger,
    };
}
