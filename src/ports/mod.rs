//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: Transaction submission, receipts and read-only calls
//! - `WalletProvider`: Account connect / disconnect
//! - `Notifier`: Delivery of flow progress and outcomes

pub mod chain_client;
pub mod notifier;
pub mod wallet;
