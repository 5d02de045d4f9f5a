//! Token Exchange Client - Library Root
//!
//! Buy an exchange token with ETH and sell it back through the
//! exchange contract (approve, then sell). Re-exports all modules for
//! the binary, integration tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
