//! Live Feed Client - Reconnecting Real-time Sales Feed
//!
//! Keeps one persistent connection to the dashboard's sales feed,
//! hands every decoded JSON event to the caller's handler and
//! reconnects with exponential backoff after any loss.
//!
//! Lifecycle per attempt:
//! 1. `Connecting`: dial the endpoint through the `FeedTransport` port
//! 2. `Connected`: reset backoff, report live, stream frames
//! 3. `Disconnected`: report reconnecting, wait the current delay, double it
//!
//! Malformed payloads are logged and dropped without touching the
//! connection. Transport errors force-close the connection and share the
//! close path. Nothing is ever surfaced to the caller: `run` never returns.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::FeedConfig;
use crate::domain::backoff::Backoff;
use crate::domain::connection::{ConnectionState, FeedStateMachine};
use crate::domain::error::FeedError;
use crate::ports::{
    EventHandler, FeedConnection, FeedTelemetry, FeedTransport, Frame, NoopStatusSink,
    NoopTelemetry, Scheduler, StatusSink,
};

/// Auto-reconnecting client for the live sales feed.
pub struct LiveFeedClient {
    /// Feed endpoint.
    url: String,
    /// Connection factory.
    transport: Arc<dyn FeedTransport>,
    /// Retry timer.
    scheduler: Arc<dyn Scheduler>,
    /// Receives decoded events.
    handler: Arc<dyn EventHandler>,
    /// Receives live/reconnecting transitions.
    status: Arc<dyn StatusSink>,
    /// Lifecycle counters.
    telemetry: Arc<dyn FeedTelemetry>,
    /// Connection state and retry delay.
    machine: FeedStateMachine,
}

impl LiveFeedClient {
    /// Create a client with default backoff (1s doubling to 30s) and no
    /// status reporting.
    pub fn new(
        url: impl Into<String>,
        transport: Arc<dyn FeedTransport>,
        scheduler: Arc<dyn Scheduler>,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            url: url.into(),
            transport,
            scheduler,
            handler,
            status: Arc::new(NoopStatusSink),
            telemetry: Arc::new(NoopTelemetry),
            machine: FeedStateMachine::default(),
        }
    }

    /// Create a client from the `[feed]` config section.
    pub fn from_config(
        config: &FeedConfig,
        transport: Arc<dyn FeedTransport>,
        scheduler: Arc<dyn Scheduler>,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self::new(config.url.clone(), transport, scheduler, handler)
            .with_backoff(Backoff::new(config.initial_retry_ms, config.max_retry_ms))
    }

    /// Report connectivity to `status`.
    #[must_use]
    pub fn with_status_sink(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    /// Record lifecycle counters to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn FeedTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Replace the retry backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.machine = FeedStateMachine::new(backoff);
        self
    }

    /// Feed endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.machine.state()
    }

    /// Delay the next reconnect will wait.
    pub fn pending_delay(&self) -> Duration {
        self.machine.pending_delay()
    }

    /// Reconnects scheduled so far.
    pub fn reconnects(&self) -> u64 {
        self.machine.reconnects()
    }

    /// Start the feed and keep it alive forever.
    ///
    /// Never returns; the owning task ends the client by being dropped.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn run(&mut self) {
        info!("Starting live feed");
        loop {
            if let Some(delay) = self.run_once().await {
                self.scheduler.wait(delay).await;
            }
        }
    }

    /// Drive one connection attempt until it closes.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when
    /// no retry needs scheduling.
    pub async fn run_once(&mut self) -> Option<Duration> {
        self.machine.begin_connect();
        debug!(url = %self.url, "Connecting to live feed");

        match self.transport.connect(&self.url).await {
            Ok(mut conn) => {
                self.on_open();
                self.stream(conn.as_mut()).await;
                conn.close().await;
            }
            Err(e) => {
                warn!(error = %e, "Live feed connection failed");
            }
        }

        self.on_close()
    }

    fn on_open(&mut self) {
        self.machine.on_open();
        self.status.report(true);
        self.telemetry.connection_changed(true);
        info!(url = %self.url, "Live feed connected");
    }

    fn on_close(&mut self) -> Option<Duration> {
        let delay = self.machine.on_close()?;
        self.status.report(false);
        self.telemetry.connection_changed(false);
        self.telemetry.reconnect_scheduled(delay);
        warn!(
            delay_ms = millis(delay),
            next_delay_ms = millis(self.machine.pending_delay()),
            reconnects = self.machine.reconnects(),
            "Live feed disconnected, reconnecting"
        );
        Some(delay)
    }

    /// Read frames until the connection closes or errors.
    async fn stream(&self, conn: &mut dyn FeedConnection) {
        loop {
            match conn.next_frame().await {
                Some(Ok(Frame::Text(text))) => self.dispatch(text.as_bytes()),
                Some(Ok(Frame::Binary(bytes))) => self.dispatch(&bytes),
                Some(Ok(Frame::Ping | Frame::Pong)) => {
                    debug!("Live feed keep-alive");
                }
                Some(Ok(Frame::Close(reason))) => {
                    info!(reason = reason.as_deref().unwrap_or(""), "Live feed closed by server");
                    return;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Live feed transport error, closing connection");
                    return;
                }
                None => {
                    info!("Live feed stream ended");
                    return;
                }
            }
        }
    }

    /// Decode one payload and hand it to the handler.
    fn dispatch(&self, payload: &[u8]) {
        match decode_event(payload) {
            Ok(event) => {
                self.telemetry.event_received();
                self.handler.handle(event);
            }
            Err(e) => {
                self.telemetry.decode_failed();
                warn!(error = %e, len = payload.len(), "Dropping malformed live feed event");
            }
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Decode a frame payload into an opaque JSON event.
pub fn decode_event(payload: &[u8]) -> Result<Value, FeedError> {
    Ok(serde_json::from_slice(payload)?)
}
