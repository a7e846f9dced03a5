//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    url = %config.feed.url,
    initial_retry_ms = config.feed.initial_retry_ms,
    max_retry_ms = config.feed.max_retry_ms,
    metrics = config.metrics.enabled,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  let url = config.feed.url.trim();
  anyhow::ensure!(!url.is_empty(), "Feed URL must not be empty");
  anyhow::ensure!(
    url.starts_with("ws://") || url.starts_with("wss://"),
    "Feed URL must use ws:// or wss://, got {url}"
  );

  anyhow::ensure!(
    config.feed.initial_retry_ms > 0,
    "initial_retry_ms must be positive"
  );
  anyhow::ensure!(
    config.feed.max_retry_ms >= config.feed.initial_retry_ms,
    "max_retry_ms ({}) must be >= initial_retry_ms ({})",
    config.feed.max_retry_ms,
    config.feed.initial_retry_ms
  );

  anyhow::ensure!(
    !config.currency.symbol.is_empty(),
    "Currency symbol must not be empty"
  );

  if config.metrics.enabled {
    anyhow::ensure!(
      !config.metrics.bind_address.is_empty(),
      "Metrics bind_address must not be empty when metrics are enabled"
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const MINIMAL: &str = r#"
[feed]
url = "ws://localhost:8000/ws/sales"
"#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_minimal_config_uses_defaults() {
    let config = parse_config(MINIMAL).unwrap();
    assert_eq!(config.app.name, "pos-live-feed");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.feed.initial_retry_ms, 1000);
    assert_eq!(config.feed.max_retry_ms, 30000);
    assert_eq!(config.currency.symbol, "฿");
    assert!(config.metrics.enabled);
    assert_eq!(config.metrics.health_port, 8081);
  }

  #[test]
  fn test_full_config() {
    let config = parse_config(
      r#"
[app]
name = "shop-1"
log_level = "debug"

[feed]
url = "wss://dash.example.com/ws/sales"
initial_retry_ms = 500
max_retry_ms = 8000

[currency]
symbol = "$"

[metrics]
enabled = false
"#,
    )
    .unwrap();
    assert_eq!(config.app.name, "shop-1");
    assert_eq!(config.feed.initial_retry_ms, 500);
    assert_eq!(config.currency.symbol, "$");
    assert!(!config.metrics.enabled);
  }

  #[test]
  fn test_rejects_http_url() {
    let err = parse_config("[feed]\nurl = \"http://localhost/ws/sales\"\n").unwrap_err();
    assert!(err.to_string().contains("ws://"));
  }

  #[test]
  fn test_rejects_inverted_retry_limits() {
    let result = parse_config(
      "[feed]\nurl = \"ws://x/ws\"\ninitial_retry_ms = 5000\nmax_retry_ms = 1000\n",
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_rejects_missing_feed_section() {
    assert!(parse_config("[app]\nname = \"x\"\n").is_err());
  }
}
