//! Chain Client Port - On-chain Interaction Interface
//!
//! Defines the trait for talking to the target network: submitting
//! transactions on behalf of an account, waiting for receipts, and
//! read-only contract calls and balance queries. All calls are
//! scoped to a single, fixed network.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::domain::{Account, Amount, TransactionReceipt, TransactionRequest, TxId};

/// Trait for on-chain interactions.
///
/// Implementations own connection details and signing; callers only
/// see typed requests and receipts. Errors are free-form `anyhow`
/// values and are normalized by the orchestrator.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// Sign and broadcast `request` on behalf of `account`.
  ///
  /// Returns the transaction identifier once the node accepted it.
  /// Never retries: a resubmission could execute twice.
  async fn submit(
    &self,
    account: &Account,
    request: &TransactionRequest,
  ) -> anyhow::Result<TxId>;

  /// Block until the transaction is mined and return its receipt.
  ///
  /// A reverted transaction is still `Ok`, with `success == false`.
  async fn wait_for_receipt(&self, tx_id: &TxId) -> anyhow::Result<TransactionReceipt>;

  /// Execute a read-only `eth_call` against `to`.
  async fn call(&self, to: Address, calldata: Bytes) -> anyhow::Result<Bytes>;

  /// Base-currency balance of `owner` in wei.
  async fn native_balance(&self, owner: Address) -> anyhow::Result<Amount>;

  /// Check if the chain client connection is healthy.
  async fn is_healthy(&self) -> bool;
}
