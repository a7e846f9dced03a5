//! WebSocket Feed Transport - tokio-tungstenite Adapter
//!
//! Implements the `FeedTransport` port over `connect_async`, mapping
//! tungstenite messages onto transport-neutral `Frame`s. Pongs for
//! incoming pings are queued by tungstenite and flushed on the next read.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::domain::error::FeedError;
use crate::ports::{FeedConnection, FeedTransport, Frame};

/// Dials the sales feed over WebSocket (rustls for `wss://`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

#[async_trait]
impl FeedTransport for WsTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedConnection>, FeedError> {
        let (stream, response) = connect_async(url).await.map_err(|e| FeedError::Connect {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(Box::new(WsConnection { stream }))
    }
}

/// One open WebSocket to the feed.
pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedConnection for WsConnection {
    async fn next_frame(&mut self) -> Option<Result<Frame, FeedError>> {
        loop {
            let msg = match self.stream.next().await? {
                Ok(msg) => msg,
                Err(e) => return Some(Err(FeedError::Transport(e.to_string()))),
            };
            if let Some(frame) = to_frame(msg) {
                return Some(Ok(frame));
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "WebSocket close on dead connection");
        }
    }
}

/// Map a tungstenite message to a feed frame. Raw frames are skipped.
fn to_frame(msg: Message) -> Option<Frame> {
    match msg {
        Message::Text(text) => Some(Frame::Text(text.to_string())),
        Message::Binary(bytes) => Some(Frame::Binary(bytes.to_vec())),
        Message::Ping(_) => Some(Frame::Ping),
        Message::Pong(_) => Some(Frame::Pong),
        Message::Close(close) => Some(Frame::Close(close.map(|c| c.reason.to_string()))),
        Message::Frame(_) => None,
    }
}
