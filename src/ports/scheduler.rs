//! Scheduler Port - Retry Timer Abstraction
//!
//! The reconnect loop waits between attempts through this trait instead
//! of calling the runtime clock directly. Tests substitute a recorder
//! that returns immediately and keeps the requested delays.

use std::time::Duration;

use async_trait::async_trait;

/// Schedules the single outstanding retry of a feed client.
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
  /// Resolve once `delay` has elapsed.
  async fn wait(&self, delay: Duration);
}
