//! Feed Transport Port - Persistent Connection Interface
//!
//! The live feed client reaches the network only through these traits,
//! so the reconnect logic never depends on the WebSocket library and can
//! be driven by scripted connections in tests.

use async_trait::async_trait;

use crate::domain::error::FeedError;

/// A frame received from the feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
  /// UTF-8 text payload (expected to carry JSON).
  Text(String),
  /// Binary payload.
  Binary(Vec<u8>),
  /// Keep-alive ping.
  Ping,
  /// Keep-alive pong.
  Pong,
  /// Server-initiated close with optional reason.
  Close(Option<String>),
}

/// One open connection to the feed.
#[async_trait]
pub trait FeedConnection: Send {
  /// Wait for the next frame.
  ///
  /// `None` means the stream ended; `Some(Err(_))` is a transport error.
  async fn next_frame(&mut self) -> Option<Result<Frame, FeedError>>;

  /// Close the connection. Must be safe to call on a dead connection.
  async fn close(&mut self);
}

/// Factory for feed connections.
#[async_trait]
pub trait FeedTransport: Send + Sync + 'static {
  /// Open a new connection to `url`.
  async fn connect(&self, url: &str) -> Result<Box<dyn FeedConnection>, FeedError>;
}
