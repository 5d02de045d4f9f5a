//! Error taxonomy for the exchange client.
//!
//! Adapters speak `anyhow`; the orchestrator boundary normalizes every
//! failure into an `ExchangeError` so callers can tell each outcome apart.

use thiserror::Error;

use super::operation::{ChainStage, FlowStep};
use super::transaction::TxId;

/// Why a user-entered amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a plain decimal number")]
    NotNumeric,

    #[error("amount must not be negative")]
    Negative,

    #[error("amount must be greater than zero")]
    Zero,

    #[error("amount has more than {max} fractional digits")]
    TooManyDecimals { max: u8 },

    #[error("amount does not fit in 256 bits")]
    Overflow,

    #[error("{0} decimals is not supported")]
    UnsupportedDecimals(u8),
}

/// Precondition that was not met when a flow was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No wallet account is connected.
    AccountConnected,
    /// The amount field was left blank.
    AmountEntered,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountConnected => write!(f, "connect a wallet first"),
            Self::AmountEntered => write!(f, "enter an amount first"),
        }
    }
}

/// Every failure the client reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Bad user input. Nothing was submitted.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        input: String,
        #[source]
        reason: AmountError,
    },

    /// No account connected or no amount entered. Nothing was submitted.
    #[error("precondition not met: {0}")]
    PreconditionError(Precondition),

    /// A buy or sell is already in flight.
    #[error("another buy or sell is still in progress")]
    OperationInProgress,

    /// The approve sub-step of a sell failed; the sale was not attempted.
    #[error("token approval failed during {stage}: {reason}")]
    ApprovalFailed {
        stage: ChainStage,
        tx_id: Option<TxId>,
        reason: String,
    },

    /// The sell sub-step failed after a confirmed approval.
    #[error("token sale failed during {stage}: {reason}")]
    SellFailed {
        stage: ChainStage,
        tx_id: Option<TxId>,
        reason: String,
    },

    /// The buy transaction failed.
    #[error("token purchase failed during {stage}: {reason}")]
    BuyFailed {
        stage: ChainStage,
        tx_id: Option<TxId>,
        reason: String,
    },

    /// A read-only query failed. The last good snapshot stays valid.
    #[error("failed to read exchange state: {0}")]
    ReadFailure(String),
}

impl ExchangeError {
    /// Build the chain-level failure variant for a flow step.
    pub fn chain_failure(
        step: FlowStep,
        stage: ChainStage,
        tx_id: Option<TxId>,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        match step {
            FlowStep::Buy => Self::BuyFailed { stage, tx_id, reason },
            FlowStep::Approve => Self::ApprovalFailed { stage, tx_id, reason },
            FlowStep::Sell => Self::SellFailed { stage, tx_id, reason },
        }
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::PreconditionError(_) => "precondition",
            Self::OperationInProgress => "operation_in_progress",
            Self::ApprovalFailed { .. } => "approval_failed",
            Self::SellFailed { .. } => "sell_failed",
            Self::BuyFailed { .. } => "buy_failed",
            Self::ReadFailure(_) => "read_failure",
        }
    }

    /// Whether the failure happened on-chain, after input validation.
    pub fn is_chain_failure(&self) -> bool {
        matches!(
            self,
            Self::ApprovalFailed { .. } | Self::SellFailed { .. } | Self::BuyFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_failure_maps_step() {
        let err = ExchangeError::chain_failure(
            FlowStep::Approve,
            ChainStage::Submission,
            None,
            "user rejected",
        );
        assert_eq!(err.kind(), "approval_failed");
        assert!(err.is_chain_failure());

        let err = ExchangeError::chain_failure(FlowStep::Sell, ChainStage::Reverted, None, "x");
        assert!(matches!(err, ExchangeError::SellFailed { stage: ChainStage::Reverted, .. }));
    }

    #[test]
    fn test_display_identifies_stage() {
        let err = ExchangeError::chain_failure(
            FlowStep::Buy,
            ChainStage::Confirmation,
            None,
            "timed out",
        );
        assert_eq!(
            err.to_string(),
            "token purchase failed during confirmation: timed out"
        );
    }

    #[test]
    fn test_input_errors_are_not_chain_failures() {
        assert!(!ExchangeError::OperationInProgress.is_chain_failure());
        assert!(!ExchangeError::PreconditionError(Precondition::AccountConnected).is_chain_failure());
    }
}
