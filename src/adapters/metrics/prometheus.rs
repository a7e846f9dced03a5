//! Prometheus Metrics Registry - Live Feed Observability
//!
//! Counts events, decode failures and reconnects, and tracks the
//! connection gauge and current retry delay. Implements the
//! `FeedTelemetry` port and serves `/metrics` via axum.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::ports::FeedTelemetry;

/// Prometheus metrics for the live feed, named `pos_feed_*`.
pub struct FeedMetrics {
    /// Prometheus registry.
    registry: Registry,
    /// Decoded events delivered to the handler.
    pub events: IntCounter,
    /// Payloads dropped because they were not JSON.
    pub decode_failures: IntCounter,
    /// Reconnects scheduled.
    pub reconnects: IntCounter,
    /// Connection status (1 = connected, 0 = disconnected).
    pub connected: IntGauge,
    /// Delay of the most recently scheduled reconnect.
    pub retry_delay_ms: IntGauge,
}

impl FeedMetrics {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let events = IntCounter::new(
            "pos_feed_events_total",
            "Decoded live feed events delivered to the handler",
        )?;
        let decode_failures = IntCounter::new(
            "pos_feed_decode_failures_total",
            "Live feed payloads dropped as malformed",
        )?;
        let reconnects = IntCounter::new(
            "pos_feed_reconnects_total",
            "Live feed reconnects scheduled",
        )?;
        let connected = IntGauge::new(
            "pos_feed_connected",
            "Live feed connection status (1=connected, 0=disconnected)",
        )?;
        let retry_delay_ms = IntGauge::new(
            "pos_feed_retry_delay_ms",
            "Delay of the most recently scheduled reconnect in milliseconds",
        )?;

        registry.register(Box::new(events.clone()))?;
        registry.register(Box::new(decode_failures.clone()))?;
        registry.register(Box::new(reconnects.clone()))?;
        registry.register(Box::new(connected.clone()))?;
        registry.register(Box::new(retry_delay_ms.clone()))?;

        Ok(Self {
            registry,
            events,
            decode_failures,
            reconnects,
            connected,
            retry_delay_ms,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics = Arc::clone(&self);
        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics);
                async move { metrics.render() }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

impl FeedTelemetry for FeedMetrics {
    fn connection_changed(&self, connected: bool) {
        self.connected.set(i64::from(connected));
    }

    fn event_received(&self) {
        self.events.inc();
    }

    fn decode_failed(&self) {
        self.decode_failures.inc();
    }

    fn reconnect_scheduled(&self, delay: Duration) {
        self.reconnects.inc();
        self.retry_delay_ms
            .set(i64::try_from(delay.as_millis()).unwrap_or(i64::MAX));
    }
}
