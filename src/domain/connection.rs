//! Live feed connection state machine.
//!
//! ```text
//! Disconnected --begin_connect--> Connecting --on_open--> Connected
//!      ^                              |                       |
//!      +-----------on_close-----------+-----------------------+
//! ```
//!
//! There is no terminal state. The machine owns the retry backoff so
//! that doubling happens only on the close path and resets only on open.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::backoff::Backoff;

/// Connectivity of a live feed client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// A connection attempt is in flight.
    Connecting,
    /// The connection is open and events are flowing.
    Connected,
    /// No connection; a retry is scheduled or about to be.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

/// Explicit reconnect state machine for one feed client.
#[derive(Debug, Clone)]
pub struct FeedStateMachine {
    state: ConnectionState,
    backoff: Backoff,
    /// Number of retries scheduled over the client's lifetime.
    reconnects: u64,
}

impl FeedStateMachine {
    /// Create a machine in the `Disconnected` state.
    pub fn new(backoff: Backoff) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            backoff,
            reconnects: 0,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Delay the next scheduled retry will wait.
    pub fn pending_delay(&self) -> Duration {
        self.backoff.current()
    }

    /// Total retries scheduled so far.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// A new connection attempt starts.
    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// The connection opened: go live and reset the backoff.
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.backoff.reset();
    }

    /// The connection closed, errored, or failed to open.
    ///
    /// Returns the delay to wait before the next attempt and doubles the
    /// stored delay for the attempt after that. Returns `None` when the
    /// machine is already disconnected, so a close reported twice for the
    /// same connection never schedules a second retry.
    pub fn on_close(&mut self) -> Option<Duration> {
        if self.state == ConnectionState::Disconnected {
            return None;
        }
        self.state = ConnectionState::Disconnected;
        self.reconnects += 1;
        Some(self.backoff.next_delay())
    }
}

impl Default for FeedStateMachine {
    fn default() -> Self {
        Self::new(Backoff::default())
    }
}
