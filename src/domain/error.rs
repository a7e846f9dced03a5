//! Feed error types.
//!
//! Every variant is recoverable: decode errors drop one message,
//! connect/transport errors route into the reconnect path.

use thiserror::Error;

/// Errors raised while talking to the live sales feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The connection attempt itself failed (DNS, TCP, TLS, handshake).
    #[error("failed to connect to {url}: {reason}")]
    Connect {
        /// Endpoint that was dialled.
        url: String,
        /// Underlying failure description.
        reason: String,
    },

    /// An established connection reported a transport-level error.
    #[error("transport error: {0}")]
    Transport(String),

    /// A frame payload was not valid JSON.
    #[error("invalid event payload: {0}")]
    Decode(#[from] serde_json::Error),
}
