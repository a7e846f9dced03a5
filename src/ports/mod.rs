//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the live feed use case
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedTransport`: persistent connection to the sales feed
//! - `Scheduler`: retry timer
//! - `StatusSink`: connectivity reporting
//! - `EventHandler`: decoded event delivery
//! - `FeedTelemetry`: lifecycle counters for metrics

pub mod event_handler;
pub mod feed_transport;
pub mod scheduler;
pub mod status;
pub mod telemetry;

pub use event_handler::EventHandler;
pub use feed_transport::{FeedConnection, FeedTransport, Frame};
pub use scheduler::Scheduler;
pub use status::{NoopStatusSink, StatusSink};
pub use telemetry::{FeedTelemetry, NoopTelemetry};
