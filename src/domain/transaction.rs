//! Transaction requests, receipts and the contract ABI.
//!
//! A `TransactionRequest` describes one on-chain call and is immutable
//! once built. Calldata is derived on demand from the typed call via
//! the `sol!` bindings below.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

use super::amount::Amount;

/// Transaction identifier assigned on submission.
pub type TxId = TxHash;

sol! {
    /// Exchange contract surface.
    interface IExchange {
        function getExchangeInfo() external view returns (uint256, uint256, uint256);
        function buyTokens() external payable;
        function sellTokens(uint256 amount) external;
    }

    /// ERC-20 surface of the exchanged token.
    interface IToken {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

/// Which of the two contracts a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractKind {
    Exchange,
    Token,
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exchange => write!(f, "exchange"),
            Self::Token => write!(f, "token"),
        }
    }
}

/// Typed method call with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    /// `buyTokens()`, paid for with the request value.
    BuyTokens,
    /// `sellTokens(amount)`.
    SellTokens { amount: Amount },
    /// `approve(spender, amount)`.
    Approve { spender: Address, amount: Amount },
}

impl ContractCall {
    /// Solidity signature of the method.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::BuyTokens => IExchange::buyTokensCall::SIGNATURE,
            Self::SellTokens { .. } => IExchange::sellTokensCall::SIGNATURE,
            Self::Approve { .. } => IToken::approveCall::SIGNATURE,
        }
    }

    /// ABI-encoded calldata, selector included.
    pub fn calldata(&self) -> Bytes {
        let encoded = match *self {
            Self::BuyTokens => IExchange::buyTokensCall {}.abi_encode(),
            Self::SellTokens { amount } => IExchange::sellTokensCall {
                amount: amount.raw(),
            }
            .abi_encode(),
            Self::Approve { spender, amount } => IToken::approveCall {
                spender,
                amount: amount.raw(),
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }
}

/// Description of one on-chain call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    contract: ContractKind,
    to: Address,
    call: ContractCall,
    value: Amount,
}

impl TransactionRequest {
    pub fn new(contract: ContractKind, to: Address, call: ContractCall, value: Amount) -> Self {
        Self {
            contract,
            to,
            call,
            value,
        }
    }

    pub fn contract(&self) -> ContractKind {
        self.contract
    }

    /// Address of the targeted contract.
    pub fn to(&self) -> Address {
        self.to
    }

    pub fn call(&self) -> &ContractCall {
        &self.call
    }

    pub fn method(&self) -> &'static str {
        self.call.signature()
    }

    /// Base-currency value attached to the call (zero unless payable).
    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn calldata(&self) -> Bytes {
        self.call.calldata()
    }
}

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub tx_id: TxId,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub block_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;

    #[test]
    fn test_sell_calldata_roundtrips_amount() {
        let call = ContractCall::SellTokens {
            amount: Amount::from(50u64),
        };
        let data = call.calldata();
        assert_eq!(&data[..4], IExchange::sellTokensCall::SELECTOR.as_slice());

        let decoded = IExchange::sellTokensCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.amount, U256::from(50u64));
    }

    #[test]
    fn test_approve_calldata() {
        let spender = address!("D8c5d574f33EeB294a9d03C5D9EaeF78aE4b8007");
        let call = ContractCall::Approve {
            spender,
            amount: Amount::from(50u64),
        };
        let decoded = IToken::approveCall::abi_decode(&call.calldata(), true).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, U256::from(50u64));
    }

    #[test]
    fn test_buy_calldata_is_selector_only() {
        let data = ContractCall::BuyTokens.calldata();
        assert_eq!(data.len(), 4);
        assert_eq!(ContractCall::BuyTokens.signature(), "buyTokens()");
    }
}
