//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (blockchain RPC, local keys, terminal output,
//! HTTP). Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `chain`: RPC provider, chain client, wallet and contract validation via alloy-rs
//! - `metrics`: Prometheus metrics export and health checks
//! - `notify`: Terminal delivery of flow notifications

pub mod chain;
pub mod metrics;
pub mod notify;
