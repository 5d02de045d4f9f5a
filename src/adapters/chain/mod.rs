//! Chain Adapters - Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with chain-ID validation
//! - `ChainClient` implementation (submit, receipts, calls, balances)
//! - Local private-key wallet
//! - Startup validation of the configured contract addresses

pub mod client;
pub mod provider;
pub mod validator;
pub mod wallet;

pub use client::AlloyChainClient;
pub use provider::ChainProvider;
pub use validator::ContractValidator;
pub use wallet::LocalKeyWallet;
