//! Operation lifecycle types.
//!
//! `OperationState` is the single in-flight cell owned by the
//! orchestrator. `FlowStep` and `ChainStage` pin down where a
//! chain-level failure happened.

use serde::Serialize;

/// State of the orchestrator's current buy or sell flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OperationState {
    /// Ready to accept a new flow.
    #[default]
    Idle,
    /// A transaction is being handed to the chain client.
    Submitting,
    /// A submitted transaction is waiting for its receipt.
    AwaitingConfirmation,
    /// The last flow completed successfully.
    Succeeded,
    /// The last flow failed.
    Failed,
}

impl OperationState {
    /// Whether a flow currently holds the in-flight slot.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::AwaitingConfirmation)
    }
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::AwaitingConfirmation => write!(f, "awaiting confirmation"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Transaction step within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStep {
    Buy,
    Approve,
    Sell,
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Approve => write!(f, "approve"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Point in a transaction's life where it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChainStage {
    /// Signing or broadcasting was refused or errored.
    Submission,
    /// The receipt could not be obtained.
    Confirmation,
    /// The transaction was mined but reverted.
    Reverted,
}

impl std::fmt::Display for ChainStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submission => write!(f, "submission"),
            Self::Confirmation => write!(f, "confirmation"),
            Self::Reverted => write!(f, "execution"),
        }
    }
}
