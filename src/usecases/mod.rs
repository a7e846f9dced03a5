//! Use Cases Layer - Application Logic Orchestration
//!
//! Wires domain state machines to ports. The live feed client is the
//! only long-running use case: it owns its connection state and backoff
//! and talks to the outside world through transport, scheduler, status
//! and telemetry ports.

pub mod live_feed;

pub use live_feed::LiveFeedClient;
