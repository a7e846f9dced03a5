//! POS Live Feed — Entry Point
//!
//! Connects to the dashboard's live sales feed and logs every sale
//! until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from argv[1] or POS_FEED_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Spawn metrics (/metrics) and health (/live + /ready) servers
//! 4. Spawn the live feed (auto-reconnect WebSocket, 1s → 30s backoff)
//! 5. Wait for SIGINT → drop the feed task, stop servers

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use pos_live_feed::adapters::feeds::websocket_feed;
use pos_live_feed::adapters::metrics::{FeedMetrics, HealthServer, HealthState};
use pos_live_feed::adapters::status::{HealthStatusSink, LogStatusSink, StatusFanout};
use pos_live_feed::config::{self, AppConfig};
use pos_live_feed::domain::currency::CurrencyFormatter;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("POS_FEED_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        url = %config.feed.url,
        "Starting POS live feed"
    );

    // ── 3. Shutdown channel + observability servers ─────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());
    let mut servers = Vec::new();

    let metrics = if config.metrics.enabled {
        let metrics = Arc::new(FeedMetrics::new().context("Failed to register metrics")?);

        let bind = config.metrics.bind_address.clone();
        let rx = shutdown_tx.subscribe();
        let serving = Arc::clone(&metrics);
        servers.push(tokio::spawn(async move {
            if let Err(e) = serving.serve(bind, rx).await {
                error!(error = %e, "Metrics server failed");
            }
        }));

        let server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
        let rx = shutdown_tx.subscribe();
        servers.push(tokio::spawn(async move {
            if let Err(e) = server.run(rx).await {
                error!(error = %e, "Health server failed");
            }
        }));

        Some(metrics)
    } else {
        None
    };

    // ── 4. Live feed ────────────────────────────────────────
    let mut feed = build_feed(&config, &health, metrics);
    let feed_handle = tokio::spawn(async move { feed.run().await });

    info!("Live feed running");

    // ── 5. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, shutting down");

    health.begin_shutdown();
    feed_handle.abort();
    let _ = shutdown_tx.send(());

    for handle in servers {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Wire the WebSocket feed with the sale-logging handler, status sinks
/// and optional metrics.
fn build_feed(
    config: &AppConfig,
    health: &Arc<HealthState>,
    metrics: Option<Arc<FeedMetrics>>,
) -> pos_live_feed::usecases::LiveFeedClient {
    let formatter = CurrencyFormatter::new(config.currency.symbol.clone());
    let handler = move |event: Value| log_sale(&formatter, &event);

    let status = StatusFanout::new()
        .with(Arc::new(LogStatusSink::new(config.app.name.clone())))
        .with(Arc::new(HealthStatusSink::new(Arc::clone(health))));

    let feed = websocket_feed(&config.feed, Arc::new(handler)).with_status_sink(Arc::new(status));
    match metrics {
        Some(m) => feed.with_telemetry(m),
        None => feed,
    }
}

/// Log one sale event. Shape is not enforced: missing fields log as `-`.
fn log_sale(formatter: &CurrencyFormatter, event: &Value) {
    let id = event
        .get("transaction_id")
        .or_else(|| event.get("id"))
        .map_or_else(|| "-".to_string(), Value::to_string);
    let total = event
        .get("total")
        .or_else(|| event.get("sum"))
        .map_or_else(|| "-".to_string(), |v| formatter.format_value(v));

    info!(id = %id, total = %total, "Sale received");
}
