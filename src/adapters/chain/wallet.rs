//! Local Key Wallet - `WalletProvider` Backed by a Private Key
//!
//! Loads a signing key from the `PRIVATE_KEY` environment variable.
//! The key itself never leaves this adapter: the provider gets an
//! `EthereumWallet` for signing, the core gets an `Account`.

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::network::EthereumWallet;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::Account;
use crate::ports::wallet::WalletProvider;

/// Environment variable holding the hex-encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Wallet holding a single local signing key.
pub struct LocalKeyWallet {
    signer: PrivateKeySigner,
    connected: AtomicBool,
}

impl LocalKeyWallet {
    /// Build from an already parsed signer.
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self {
            signer,
            connected: AtomicBool::new(false),
        }
    }

    /// Load the signing key from `PRIVATE_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(PRIVATE_KEY_ENV)
            .with_context(|| format!("{PRIVATE_KEY_ENV} not set"))?;
        Self::from_hex(&key)
    }

    /// Parse a hex-encoded key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .context("Invalid private key")?;
        Ok(Self::new(signer))
    }

    /// Signing wallet for the provider's wallet filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    #[instrument(skip(self))]
    async fn connect(&self) -> Result<Account> {
        self.connected.store(true, Ordering::Relaxed);
        let account = Account::new(self.signer.address());
        debug!(account = %account, "Local key connected");
        Ok(account)
    }

    async fn disconnect(&self, account: &Account) -> Result<()> {
        anyhow::ensure!(
            account.address() == self.signer.address(),
            "Account {account} does not belong to this wallet"
        );
        self.connected.store(false, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (anvil account #0). Never funded on a real network.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_connect_yields_key_address() {
        let wallet = LocalKeyWallet::from_hex(DEV_KEY).unwrap();
        let account = wallet.connect().await.unwrap();
        assert_eq!(
            account.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert!(wallet.is_connected());

        wallet.disconnect(&account).await.unwrap();
        assert!(!wallet.is_connected());
    }

    #[test]
    fn test_rejects_garbage_key() {
        assert!(LocalKeyWallet::from_hex("not-a-key").is_err());
    }
}
