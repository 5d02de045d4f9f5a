//! Metrics and Monitoring Adapters
//!
//! Provides Prometheus metrics and health check endpoints (/live,
//! /ready, /metrics) via axum 0.7 for the `watch` command.

pub mod health;
pub mod prometheus;

pub use self::health::{HealthServer, HealthState};
pub use self::prometheus::MetricsRegistry;
