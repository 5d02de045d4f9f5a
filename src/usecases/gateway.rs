//! Contract Gateway - Typed Proxy for the Exchange and Token Contracts
//!
//! Build methods are pure: they only shape a `TransactionRequest`.
//! Read methods encode an `eth_call`, hand it to the chain client and
//! decode the result. Submission and confirmation stay with the
//! orchestrator.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::domain::transaction::{IExchange, IToken};
use crate::domain::{
  Amount, ContractAddresses, ContractCall, ContractKind, ExchangeInfo, TransactionRequest,
};
use crate::ports::chain_client::ChainClient;

/// Typed access to the two contracts.
pub struct ContractGateway<C: ChainClient> {
  chain: Arc<C>,
  addresses: ContractAddresses,
}

impl<C: ChainClient> Clone for ContractGateway<C> {
  fn clone(&self) -> Self {
    Self {
      chain: Arc::clone(&self.chain),
      addresses: self.addresses,
    }
  }
}

impl<C: ChainClient> ContractGateway<C> {
  /// Create a gateway bound to the given contract addresses.
  pub fn new(chain: Arc<C>, addresses: ContractAddresses) -> Self {
    Self { chain, addresses }
  }

  pub fn exchange_address(&self) -> Address {
    self.addresses.exchange
  }

  pub fn token_address(&self) -> Address {
    self.addresses.token
  }

  /// `buyTokens()` paying `eth_amount` wei.
  pub fn build_buy(&self, eth_amount: Amount) -> TransactionRequest {
    TransactionRequest::new(
      ContractKind::Exchange,
      self.addresses.exchange,
      ContractCall::BuyTokens,
      eth_amount,
    )
  }

  /// `approve(spender, amount)` on the token contract.
  pub fn build_approve(&self, spender: Address, amount: Amount) -> TransactionRequest {
    TransactionRequest::new(
      ContractKind::Token,
      self.addresses.token,
      ContractCall::Approve { spender, amount },
      Amount::ZERO,
    )
  }

  /// `sellTokens(amount)` on the exchange contract.
  pub fn build_sell(&self, amount: Amount) -> TransactionRequest {
    TransactionRequest::new(
      ContractKind::Exchange,
      self.addresses.exchange,
      ContractCall::SellTokens { amount },
      Amount::ZERO,
    )
  }

  /// Read `(ethReserve, tokenReserve, rate)` from the exchange.
  #[instrument(skip(self))]
  pub async fn read_exchange_info(&self) -> Result<ExchangeInfo> {
    let raw = self
      .chain
      .call(
        self.addresses.exchange,
        IExchange::getExchangeInfoCall {}.abi_encode().into(),
      )
      .await
      .context("getExchangeInfo call failed")?;

    let ret = IExchange::getExchangeInfoCall::abi_decode_returns(&raw, true)
      .context("Malformed getExchangeInfo return data")?;

    let info = ExchangeInfo {
      eth_reserve: ret._0.into(),
      token_reserve: ret._1.into(),
      rate: ret._2.into(),
    };
    debug!(?info, "Exchange info read");
    Ok(info)
  }

  /// Token balance of `owner` in base units.
  #[instrument(skip(self))]
  pub async fn read_token_balance(&self, owner: Address) -> Result<Amount> {
    let raw = self
      .chain
      .call(
        self.addresses.token,
        IToken::balanceOfCall { owner }.abi_encode().into(),
      )
      .await
      .context("balanceOf call failed")?;

    let ret = IToken::balanceOfCall::abi_decode_returns(&raw, true)
      .context("Malformed balanceOf return data")?;
    Ok(Amount::new(ret._0))
  }

  /// Amount `spender` may currently transfer on behalf of `owner`.
  #[instrument(skip(self))]
  pub async fn read_allowance(&self, owner: Address, spender: Address) -> Result<Amount> {
    let raw = self
      .chain
      .call(
        self.addresses.token,
        IToken::allowanceCall { owner, spender }.abi_encode().into(),
      )
      .await
      .context("allowance call failed")?;

    let ret: U256 = IToken::allowanceCall::abi_decode_returns(&raw, true)
      .context("Malformed allowance return data")?
      ._0;
    Ok(Amount::new(ret))
  }
}
