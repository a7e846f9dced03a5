//! Live Feed Adapters - Real-time Sales Streaming
//!
//! Provides the WebSocket transport for the live sales feed and a
//! constructor that wires it to the tokio retry timer.

pub mod websocket;

use std::sync::Arc;

pub use websocket::WsTransport;

use crate::adapters::timer::TokioScheduler;
use crate::config::FeedConfig;
use crate::ports::EventHandler;
use crate::usecases::LiveFeedClient;

/// Build a live feed client over WebSocket with tokio timers.
pub fn websocket_feed(config: &FeedConfig, handler: Arc<dyn EventHandler>) -> LiveFeedClient {
    LiveFeedClient::from_config(
        config,
        Arc::new(WsTransport),
        Arc::new(TokioScheduler),
        handler,
    )
}
