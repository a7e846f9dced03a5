//! Configuration Module - TOML-based Feed Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! The feed endpoint, retry limits, display currency and metrics
//! endpoints are all externalized here.

pub mod loader;

use serde::Deserialize;

use crate::domain::backoff::{DEFAULT_INITIAL_RETRY_MS, DEFAULT_MAX_RETRY_MS};
use crate::domain::currency::DEFAULT_SYMBOL;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup and validated before the
/// feed connects.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Live feed endpoint and retry limits.
  pub feed: FeedConfig,
  /// Currency display.
  #[serde(default)]
  pub currency: CurrencyConfig,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable name used in logs.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Live feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
  /// WebSocket endpoint of the sales feed (`ws://` or `wss://`).
  pub url: String,
  /// First retry delay after a disconnect (milliseconds).
  #[serde(default = "default_initial_retry")]
  pub initial_retry_ms: u64,
  /// Retry delay ceiling (milliseconds).
  #[serde(default = "default_max_retry")]
  pub max_retry_ms: u64,
}

/// Currency display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
  /// Symbol prefixed to amounts.
  #[serde(default = "default_symbol")]
  pub symbol: String,
}

impl Default for CurrencyConfig {
  fn default() -> Self {
    Self {
      symbol: default_symbol(),
    }
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics and health endpoints.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      bind_address: default_metrics_addr(),
      health_port: default_health_port(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "pos-live-feed".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_initial_retry() -> u64 {
  DEFAULT_INITIAL_RETRY_MS
}

fn default_max_retry() -> u64 {
  DEFAULT_MAX_RETRY_MS
}

fn default_symbol() -> String {
  DEFAULT_SYMBOL.to_string()
}

fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
  8081
}
