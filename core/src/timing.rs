//! Scope timing reported through `tracing`.

use std::time::Instant;

/// Logs the time spent in a scope when dropped.
#[must_use = "the duration is logged when the guard is dropped"]
pub struct LogDuration {
    operation: &'static str,
    start: Instant,
}

impl LogDuration {
    pub fn new(operation: &'static str) -> Self {
        Self { operation, start: Instant::now() }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for LogDuration {
    fn drop(&mut self) {
        tracing::info!(operation = self.operation, elapsed_ms = self.elapsed_ms(), "operation finished");
    }
}
