//! Exponential reconnect backoff.
//!
//! Starts at 1s, doubles after every failed or closed connection,
//! saturates at 30s and snaps back to the initial delay once a
//! connection opens successfully.

use std::time::Duration;

/// Default first retry delay in milliseconds.
pub const DEFAULT_INITIAL_RETRY_MS: u64 = 1_000;

/// Default retry delay ceiling in milliseconds.
pub const DEFAULT_MAX_RETRY_MS: u64 = 30_000;

/// Retry delay tracker owned by a single feed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    /// Delay used for the first retry and after every reset (ms).
    initial_ms: u64,
    /// Upper bound for any delay (ms).
    max_ms: u64,
    /// Delay that the next scheduled retry will wait (ms).
    current_ms: u64,
}

impl Backoff {
    /// Create a backoff with explicit limits.
    ///
    /// A ceiling below the initial delay is raised to the initial delay.
    pub fn new(initial_ms: u64, max_ms: u64) -> Self {
        let initial_ms = initial_ms.max(1);
        let max_ms = max_ms.max(initial_ms);
        Self {
            initial_ms,
            max_ms,
            current_ms: initial_ms,
        }
    }

    /// Delay the next retry would wait, without advancing.
    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Delay the next retry would wait, in milliseconds.
    pub fn current_ms(&self) -> u64 {
        self.current_ms
    }

    /// Take the delay for the retry being scheduled now and double the
    /// delay stored for the one after it.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current_ms;
        self.current_ms = delay.saturating_mul(2).min(self.max_ms);
        Duration::from_millis(delay)
    }

    /// Return to the initial delay after a successful connection.
    pub fn reset(&mut self) {
        self.current_ms = self.initial_ms;
    }

    /// Configured ceiling in milliseconds.
    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_RETRY_MS, DEFAULT_MAX_RETRY_MS)
    }
}
