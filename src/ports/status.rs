//! Status Sink Port - Connectivity Reporting
//!
//! Replaces a page status indicator: the feed client reports every
//! transition to live (`true`) or reconnecting (`false`).

/// Receives connectivity changes from a feed client.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send + Sync {
  /// Report whether the feed is currently connected.
  fn report(&self, connected: bool);
}

/// Sink that ignores all reports, for hosts without a status display.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
  fn report(&self, _connected: bool) {}
}
