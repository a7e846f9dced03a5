//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (WebSockets, tokio timers, HTTP servers).
//!
//! Adapter categories:
//! - `feeds`: WebSocket transport for the live sales feed
//! - `metrics`: Prometheus metrics export and health checks
//! - `status`: log / health / fan-out status sinks
//! - `timer`: tokio-backed retry scheduler

pub mod feeds;
pub mod metrics;
pub mod status;
pub mod timer;
