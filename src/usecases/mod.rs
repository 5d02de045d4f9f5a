//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! client's workflows.
//!
//! Use cases:
//! - `ContractGateway`: Typed request building and contract reads
//! - `TransactionOrchestrator`: Buy and approve-then-sell flows
//! - `ExchangeStateReader`: Balance and exchange-info snapshots
//! - `Session`: Connected account plus the surface exposed upward

pub mod gateway;
pub mod orchestrator;
pub mod session;
pub mod state_reader;

pub use gateway::ContractGateway;
pub use orchestrator::{OrchestratorSettings, SellReceipts, TransactionOrchestrator};
pub use session::Session;
pub use state_reader::ExchangeStateReader;
