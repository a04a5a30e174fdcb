//! Scripted operation factories.

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// An operation factory that replays a scripted sequence of outcomes.
///
/// Each call pops the next scripted outcome; once the script is empty every
/// call returns the fallback outcome.
#[derive(Debug)]
pub struct ScriptedOperation<T> {
    script: Mutex<VecDeque<Result<T, String>>>,
    fallback: Result<T, String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Instant>>,
}

impl<T> ScriptedOperation<T>
where
    T: Clone + Send + 'static,
{
    fn with_fallback(fallback: Result<T, String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates an operation that succeeds with `value` once the script runs out.
    #[must_use]
    pub fn succeeding(value: T) -> Self {
        Self::with_fallback(Ok(value))
    }

    /// Creates an operation that always fails with `message` once the script runs out.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_fallback(Err(message.into()))
    }

    /// Scripts `times` failures with `message` ahead of the fallback.
    #[must_use]
    pub fn then_fail(self, message: impl Into<String>, times: usize) -> Self {
        let message = message.into();
        {
            let mut script = self.script.lock();
            for _ in 0..times {
                script.push_back(Err(message.clone()));
            }
        }
        self
    }

    /// Scripts a single success ahead of the fallback.
    #[must_use]
    pub fn then_succeed(self, value: T) -> Self {
        self.script.lock().push_back(Ok(value));
        self
    }

    /// Makes every call sleep before settling.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Starts a fresh attempt.
    pub fn call(&self) -> BoxFuture<'static, Result<T, String>> {
        self.calls.lock().push(Instant::now());
        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
        .boxed()
    }

    /// Number of attempts started.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// When each attempt was started.
    #[must_use]
    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().clone()
    }

    /// Gaps between consecutive attempt starts.
    #[must_use]
    pub fn call_gaps(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }
}
