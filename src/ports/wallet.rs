//! Wallet Provider Port - Account Lifecycle
//!
//! The wallet owns key material. The core only ever sees the
//! resulting `Account`.

use async_trait::async_trait;

use crate::domain::Account;

/// Trait for wallet providers.
#[async_trait]
pub trait WalletProvider: Send + Sync + 'static {
  /// Connect and return the account that will authorize transactions.
  async fn connect(&self) -> anyhow::Result<Account>;

  /// Release the account. Pending transactions are unaffected.
  async fn disconnect(&self, account: &Account) -> anyhow::Result<()>;
}
