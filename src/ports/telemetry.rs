//! Telemetry Port - Feed Counters
//!
//! Hooks the live feed calls at each lifecycle point so metrics
//! adapters can count events without the use case knowing about them.
//! Every hook defaults to a no-op.

use std::time::Duration;

/// Observer of feed lifecycle counters.
pub trait FeedTelemetry: Send + Sync {
  /// The connection opened (`true`) or closed (`false`).
  fn connection_changed(&self, _connected: bool) {}

  /// A decoded event was handed to the handler.
  fn event_received(&self) {}

  /// A payload failed to decode and was dropped.
  fn decode_failed(&self) {}

  /// A reconnect was scheduled after `delay`.
  fn reconnect_scheduled(&self, _delay: Duration) {}
}

/// Telemetry that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl FeedTelemetry for NoopTelemetry {}
