//! Status Sink Adapters
//!
//! Concrete receivers for live/reconnecting transitions: structured
//! logs, the readiness flag of the health server, and a fan-out that
//! forwards to several sinks at once.

use std::sync::Arc;

use tracing::{info, warn};

use super::metrics::HealthState;
use crate::ports::StatusSink;

/// Logs every status change.
#[derive(Debug, Clone)]
pub struct LogStatusSink {
    feed: String,
}

impl LogStatusSink {
    /// Sink that tags its log lines with `feed`.
    pub fn new(feed: impl Into<String>) -> Self {
        Self { feed: feed.into() }
    }
}

impl StatusSink for LogStatusSink {
    fn report(&self, connected: bool) {
        if connected {
            info!(feed = %self.feed, status = "live", "Feed status");
        } else {
            warn!(feed = %self.feed, status = "reconnecting", "Feed status");
        }
    }
}

/// Drives the `/ready` probe from feed connectivity.
#[derive(Debug, Clone)]
pub struct HealthStatusSink {
    state: Arc<HealthState>,
}

impl HealthStatusSink {
    pub fn new(state: Arc<HealthState>) -> Self {
        Self { state }
    }
}

impl StatusSink for HealthStatusSink {
    fn report(&self, connected: bool) {
        self.state.set_feed_connected(connected);
    }
}

/// Forwards each report to every inner sink, in order.
#[derive(Clone, Default)]
pub struct StatusFanout {
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl StatusFanout {
    /// Empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are attached.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl StatusSink for StatusFanout {
    fn report(&self, connected: bool) {
        for sink in &self.sinks {
            sink.report(connected);
        }
    }
}
