//! Exchange State Reader - Read-only Exchange and Account Balances
//!
//! Queries exchange info, the account's ETH balance and its token
//! balance concurrently and caches the result. A failed refresh is
//! returned and notified as `ReadFailure` and leaves the cached
//! snapshot untouched, so callers keep showing the last known good
//! values.
//!
//! Never touches `OperationState`; refreshes may run while a buy or
//! sell is in flight.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::domain::{Account, ExchangeError, ExchangeSnapshot, Notification};
use crate::ports::chain_client::ChainClient;
use crate::ports::notifier::Notifier;

use super::gateway::ContractGateway;

/// Caches the latest successfully read `ExchangeSnapshot`.
pub struct ExchangeStateReader<C: ChainClient> {
  chain: Arc<C>,
  gateway: ContractGateway<C>,
  latest: RwLock<Option<ExchangeSnapshot>>,
  notifiers: Vec<Arc<dyn Notifier>>,
}

impl<C: ChainClient> ExchangeStateReader<C> {
  /// Create a reader with an empty cache.
  pub fn new(chain: Arc<C>, gateway: ContractGateway<C>) -> Self {
    Self {
      chain,
      gateway,
      latest: RwLock::new(None),
      notifiers: Vec::new(),
    }
  }

  /// Add a sink for refresh failures.
  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifiers.push(notifier);
    self
  }

  /// Re-read exchange info and the account's balances.
  #[instrument(skip(self), fields(account = %account))]
  pub async fn refresh(&self, account: &Account) -> Result<ExchangeSnapshot, ExchangeError> {
    let owner = account.address();

    let read = tokio::try_join!(
      self.gateway.read_exchange_info(),
      self.chain.native_balance(owner),
      self.gateway.read_token_balance(owner),
    );

    let (exchange_info, account_base_balance, account_token_balance) = match read {
      Ok(values) => values,
      Err(e) => {
        warn!(error = %e, "Refresh failed, keeping previous snapshot");
        let err = ExchangeError::ReadFailure(format!("{e:#}"));
        let notification = Notification::Failed(err.clone());
        for notifier in &self.notifiers {
          notifier.notify(&notification);
        }
        return Err(err);
      }
    };

    let snapshot = ExchangeSnapshot {
      exchange_info,
      account_base_balance,
      account_token_balance,
      fetched_at: Utc::now(),
    };

    {
      let mut latest = self.latest.write().await;
      *latest = Some(snapshot.clone());
    }

    debug!(rate = %snapshot.exchange_info.display_rate(), "Snapshot refreshed");
    Ok(snapshot)
  }

  /// Last successfully read snapshot, if any.
  pub async fn latest(&self) -> Option<ExchangeSnapshot> {
    self.latest.read().await.clone()
  }

  /// Drop the cached snapshot (e.g. when the account changes).
  pub async fn clear(&self) {
    let mut latest = self.latest.write().await;
    *latest = None;
  }
}
