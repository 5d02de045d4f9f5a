//! alloy Chain Client - `ChainClient` Port Implementation
//!
//! Submits typed requests through the wallet-enabled provider, polls
//! for receipts, and serves read-only calls and balance queries.
//! Submission is never retried; the receipt wait is bounded by the
//! configured timeout.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest as RpcTransactionRequest;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::NetworkConfig;
use crate::domain::{Account, Amount, TransactionReceipt, TransactionRequest, TxId};
use crate::ports::chain_client::ChainClient;

use super::provider::ChainProvider;

/// `ChainClient` backed by an alloy provider.
pub struct AlloyChainClient {
    /// Shared RPC provider.
    provider: Arc<ChainProvider>,
    /// Delay between receipt polls.
    poll_interval: Duration,
    /// Upper bound on a single receipt wait.
    receipt_timeout: Duration,
}

impl AlloyChainClient {
    pub fn new(provider: Arc<ChainProvider>, config: &NetworkConfig) -> Self {
        Self {
            provider,
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        }
    }
}

/// Map a domain request onto an RPC transaction sent from `from`.
fn to_rpc_request(from: Address, request: &TransactionRequest) -> RpcTransactionRequest {
    RpcTransactionRequest::default()
        .from(from)
        .to(request.to())
        .input(request.calldata().into())
        .value(request.value().raw())
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    #[instrument(skip(self, request), fields(method = request.method(), to = %request.to()))]
    async fn submit(&self, account: &Account, request: &TransactionRequest) -> Result<TxId> {
        let tx = to_rpc_request(account.address(), request);

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .with_context(|| format!("Failed to submit {}", request.method()))?;

        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self), fields(tx_id = %tx_id))]
    async fn wait_for_receipt(&self, tx_id: &TxId) -> Result<TransactionReceipt> {
        let inner = self.provider.inner();
        let tx_id = *tx_id;

        let poll = async {
            loop {
                let receipt = inner
                    .get_transaction_receipt(tx_id)
                    .await
                    .context("Receipt query failed")?;

                if let Some(receipt) = receipt {
                    return Ok::<_, anyhow::Error>(receipt);
                }

                debug!("Receipt not available yet");
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        let receipt = tokio::time::timeout(self.receipt_timeout, poll)
            .await
            .map_err(|_| {
                anyhow!(
                    "No receipt for {tx_id} after {}s",
                    self.receipt_timeout.as_secs()
                )
            })??;

        Ok(TransactionReceipt {
            tx_id: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
        })
    }

    #[instrument(skip(self, calldata), fields(to = %to))]
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = RpcTransactionRequest::default().to(to).input(calldata.into());

        self.provider
            .inner()
            .call(&tx)
            .await
            .with_context(|| format!("eth_call to {to} failed"))
    }

    #[instrument(skip(self))]
    async fn native_balance(&self, owner: Address) -> Result<Amount> {
        let balance = self
            .provider
            .inner()
            .get_balance(owner)
            .await
            .context("eth_getBalance failed")?;
        Ok(Amount::new(balance))
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;
    use crate::domain::{ContractCall, ContractKind};

    #[test]
    fn test_rpc_request_carries_value_and_calldata() {
        let from = address!("1111111111111111111111111111111111111111");
        let exchange = address!("D8c5d574f33EeB294a9d03C5D9EaeF78aE4b8007");
        let request = TransactionRequest::new(
            ContractKind::Exchange,
            exchange,
            ContractCall::BuyTokens,
            Amount::from(10_000_000_000_000_000u64),
        );

        let tx = to_rpc_request(from, &request);
        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.value, Some(U256::from(10_000_000_000_000_000u64)));
        assert_eq!(tx.input.input().cloned(), Some(request.calldata()));
    }
}
