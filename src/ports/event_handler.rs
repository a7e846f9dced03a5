//! Event Handler Port - Decoded Event Delivery
//!
//! The feed client hands every decoded JSON event to an `EventHandler`
//! exactly once. The payload is opaque: the client never inspects it.

use serde_json::Value;

/// Consumer of decoded feed events.
pub trait EventHandler: Send + Sync {
  /// Handle one decoded event.
  fn handle(&self, event: Value);
}

impl<F> EventHandler for F
where
  F: Fn(Value) + Send + Sync,
{
  fn handle(&self, event: Value) {
    self(event);
  }
}
