//! RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the target network via alloy-rs.
//! Validates RPC connectivity and chain ID at startup and exposes a
//! shared provider instance for all on-chain operations.
//!
//! `on_builtin()` yields a `BoxTransport`-backed filler stack; we
//! store it type-erased as `dyn Provider` so the wallet-enabled and
//! read-only variants share one type.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::NetworkConfig;

/// Shared RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling.
pub struct ChainProvider {
    /// The alloy provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Chain ID confirmed at connect time.
    chain_id: u64,
}

impl ChainProvider {
    /// Connect to the RPC endpoint and validate the chain ID.
    ///
    /// With a wallet, the provider fills nonce, gas and chain ID and
    /// signs every `send_transaction` whose `from` matches one of the
    /// wallet's signers. Without one it is read-only.
    #[instrument(skip_all, fields(expected_chain_id = config.chain_id))]
    pub async fn connect(config: &NetworkConfig, wallet: Option<EthereumWallet>) -> Result<Self> {
        let rpc_url = config.rpc_url.as_str();

        let provider: Arc<dyn Provider + Send + Sync> = match wallet {
            Some(wallet) => Arc::new(
                ProviderBuilder::new()
                    .with_recommended_fillers()
                    .wallet(wallet)
                    .on_builtin(rpc_url)
                    .await
                    .context("Failed to connect to RPC endpoint")?,
            ),
            None => Arc::new(
                ProviderBuilder::new()
                    .on_builtin(rpc_url)
                    .await
                    .context("Failed to connect to RPC endpoint")?,
            ),
        };

        // Validate chain ID at startup
        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != config.chain_id {
            anyhow::bail!(
                "Expected chain_id={}, RPC endpoint reports {chain_id}",
                config.chain_id
            );
        }

        info!(chain_id, "Connected to RPC");

        Ok(Self { provider, chain_id })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
