//! Notification Adapters
//!
//! Deliver orchestrator notifications to the terminal. Metrics are
//! counted by `adapters::metrics::MetricsRegistry`, which implements
//! the same port.

pub mod console;

pub use console::ConsoleNotifier;
