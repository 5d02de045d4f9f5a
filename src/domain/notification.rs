//! User-facing notifications emitted by the orchestrator.
//!
//! Every flow outcome (success or each failure kind) maps to a distinct
//! notification so the presentation layer can tell them apart.

use serde::Serialize;

use super::error::ExchangeError;
use super::transaction::TxId;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Progress or outcome of a buy/sell flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PurchaseSubmitting,
    ApprovalSubmitting,
    /// Approval skipped because the allowance already covers the sale.
    ApprovalSkipped,
    SaleSubmitting,
    Purchased { tx_id: TxId },
    Sold { tx_id: TxId },
    Failed(ExchangeError),
}

impl Notification {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::PurchaseSubmitting
            | Self::ApprovalSubmitting
            | Self::ApprovalSkipped
            | Self::SaleSubmitting => NoticeLevel::Info,
            Self::Purchased { .. } | Self::Sold { .. } => NoticeLevel::Success,
            Self::Failed(_) => NoticeLevel::Error,
        }
    }

    /// Stable key, one per distinguishable outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PurchaseSubmitting => "purchase_submitting",
            Self::ApprovalSubmitting => "approval_submitting",
            Self::ApprovalSkipped => "approval_skipped",
            Self::SaleSubmitting => "sale_submitting",
            Self::Purchased { .. } => "purchased",
            Self::Sold { .. } => "sold",
            Self::Failed(err) => err.kind(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::PurchaseSubmitting => "Processing purchase...".to_string(),
            Self::ApprovalSubmitting => "Approving tokens...".to_string(),
            Self::ApprovalSkipped => "Existing allowance covers the sale, skipping approval".to_string(),
            Self::SaleSubmitting => "Processing sale...".to_string(),
            Self::Purchased { tx_id } => format!("Tokens purchased successfully! ({tx_id})"),
            Self::Sold { tx_id } => format!("Tokens sold successfully! ({tx_id})"),
            Self::Failed(err) => match err {
                ExchangeError::InvalidAmount { .. } => format!("Please enter a valid amount: {err}"),
                ExchangeError::PreconditionError(_) => {
                    "Please connect wallet and enter amount".to_string()
                }
                ExchangeError::OperationInProgress => {
                    "Please wait for the current transaction to finish".to_string()
                }
                ExchangeError::ApprovalFailed { .. } => {
                    format!("Error approving tokens, nothing was sold: {err}")
                }
                ExchangeError::SellFailed { .. } => {
                    format!("Error selling tokens. Please try again. {err}")
                }
                ExchangeError::BuyFailed { .. } => {
                    format!("Error buying tokens. Please try again. {err}")
                }
                ExchangeError::ReadFailure(_) => format!("Could not refresh balances: {err}"),
            },
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level(), self.message())
    }
}
