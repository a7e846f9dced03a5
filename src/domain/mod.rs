//! Domain layer - feed state, backoff and dashboard helpers.
//!
//! Pure logic with no I/O: the reconnect state machine and its backoff,
//! plus the stateless currency, table and chart helpers the dashboard
//! renders with. Everything here is testable in isolation.

pub mod backoff;
pub mod charts;
pub mod connection;
pub mod currency;
pub mod error;
pub mod table;

// Re-export core types for convenience
pub use backoff::Backoff;
pub use charts::{ChartConfig, DailyBreakdown, HourlyBreakdown, SaleRecord};
pub use connection::{ConnectionState, FeedStateMachine};
pub use currency::CurrencyFormatter;
pub use error::FeedError;
pub use table::{SortDirection, TableSorter};
