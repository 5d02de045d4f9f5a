//! Domain layer - Core exchange types and pure logic.
//!
//! Amounts, requests, receipts, snapshots, operation states and the
//! error taxonomy. Nothing here performs I/O; everything is testable
//! in isolation.

pub mod account;
pub mod amount;
pub mod error;
pub mod exchange;
pub mod notification;
pub mod operation;
pub mod transaction;

// Re-export core types for convenience
pub use account::Account;
pub use amount::{Amount, DEFAULT_DISPLAY_PRECISION, ETH_DECIMALS, from_base_units, to_base_units};
pub use error::{AmountError, ExchangeError, Precondition};
pub use exchange::{ContractAddresses, ExchangeInfo, ExchangeSnapshot};
pub use notification::{NoticeLevel, Notification};
pub use operation::{ChainStage, FlowStep, OperationState};
pub use transaction::{ContractCall, ContractKind, TransactionReceipt, TransactionRequest, TxId};
