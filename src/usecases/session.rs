//! Session - Explicit Per-user Session State
//!
//! Owns the connected account (zero or one) and wires it into the
//! orchestrator and the state reader. This is the surface exposed to
//! a presentation layer: `connect`, `disconnect`, `buy`, `sell`,
//! `refresh`, plus read-only views of the operation state, the last
//! error and the latest snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{RwLock, watch};
use tracing::{info, instrument};

use crate::domain::{
  Account, ExchangeError, ExchangeSnapshot, OperationState, Precondition, TransactionReceipt,
};
use crate::ports::chain_client::ChainClient;
use crate::ports::wallet::WalletProvider;

use super::orchestrator::{SellReceipts, TransactionOrchestrator};
use super::state_reader::ExchangeStateReader;

/// One user session against the exchange.
pub struct Session<C: ChainClient, W: WalletProvider> {
  wallet: Arc<W>,
  account: RwLock<Option<Account>>,
  orchestrator: TransactionOrchestrator<C>,
  reader: ExchangeStateReader<C>,
}

impl<C: ChainClient, W: WalletProvider> Session<C, W> {
  /// Create a disconnected session.
  pub fn new(
    wallet: Arc<W>,
    orchestrator: TransactionOrchestrator<C>,
    reader: ExchangeStateReader<C>,
  ) -> Self {
    Self {
      wallet,
      account: RwLock::new(None),
      orchestrator,
      reader,
    }
  }

  /// Connect the wallet. Replaces any previously connected account.
  #[instrument(skip(self))]
  pub async fn connect(&self) -> Result<Account> {
    let account = self.wallet.connect().await.context("Wallet connect failed")?;

    let previous = {
      let mut slot = self.account.write().await;
      slot.replace(account)
    };

    if let Some(previous) = previous.filter(|p| *p != account) {
      self.reader.clear().await;
      self
        .wallet
        .disconnect(&previous)
        .await
        .context("Failed to release previous account")?;
    }

    info!(account = %account, "Wallet connected");
    Ok(account)
  }

  /// Disconnect the current account, if any.
  #[instrument(skip(self))]
  pub async fn disconnect(&self) -> Result<()> {
    let previous = {
      let mut slot = self.account.write().await;
      slot.take()
    };

    if let Some(account) = previous {
      self.reader.clear().await;
      self
        .wallet
        .disconnect(&account)
        .await
        .context("Wallet disconnect failed")?;
      info!(account = %account, "Wallet disconnected");
    }
    Ok(())
  }

  /// Currently connected account.
  pub async fn account(&self) -> Option<Account> {
    *self.account.read().await
  }

  pub async fn buy(&self, eth_amount: &str) -> Result<TransactionReceipt, ExchangeError> {
    let account = self.account().await;
    self.orchestrator.buy(account.as_ref(), eth_amount).await
  }

  pub async fn sell(&self, token_amount: &str) -> Result<SellReceipts, ExchangeError> {
    let account = self.account().await;
    self.orchestrator.sell(account.as_ref(), token_amount).await
  }

  /// Refresh the snapshot for the connected account.
  pub async fn refresh(&self) -> Result<ExchangeSnapshot, ExchangeError> {
    let account = self
      .account()
      .await
      .ok_or(ExchangeError::PreconditionError(Precondition::AccountConnected))?;
    self.reader.refresh(&account).await
  }

  pub fn operation_state(&self) -> OperationState {
    self.orchestrator.state()
  }

  pub fn subscribe(&self) -> watch::Receiver<OperationState> {
    self.orchestrator.subscribe()
  }

  /// Clear a published `Succeeded`/`Failed` back to `Idle`.
  pub fn acknowledge(&self) {
    self.orchestrator.acknowledge();
  }

  pub fn last_error(&self) -> Option<ExchangeError> {
    self.orchestrator.last_error()
  }

  /// Last known good snapshot.
  pub async fn latest_snapshot(&self) -> Option<ExchangeSnapshot> {
    self.reader.latest().await
  }
}
