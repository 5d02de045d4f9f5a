//! Transaction Orchestrator - Buy and Sell Flows
//!
//! Runs each flow as a state machine over `OperationState`:
//!
//! - Buy:  Idle → Submitting → AwaitingConfirmation → Succeeded|Failed
//! - Sell: Idle → [approve: Submitting → AwaitingConfirmation]
//!              → [sell: Submitting → AwaitingConfirmation] → Succeeded|Failed
//!
//! The terminal state stays published after the flow returns, until
//! the caller acknowledges it or starts the next flow. At most one
//! flow holds the in-flight slot. A second buy or sell while one is
//! submitting or awaiting confirmation is rejected with
//! `OperationInProgress` before anything is built or submitted.
//!
//! The sell flow's partial-failure boundary sits between its two
//! sub-steps: if the approval fails in any way the sale is never
//! submitted. An allowance may or may not exist afterwards, but no
//! tokens have moved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{
  Account, Amount, ChainStage, ExchangeError, FlowStep, Notification, OperationState,
  Precondition, TransactionReceipt, TransactionRequest, to_base_units,
};
use crate::ports::chain_client::ChainClient;
use crate::ports::notifier::Notifier;

use super::gateway::ContractGateway;

/// Tunables for the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
  /// Decimals applied to buy amounts (ETH → wei).
  pub eth_decimals: u8,
  /// Decimals applied to sell amounts as typed by the user.
  pub token_input_decimals: u8,
  /// Skip the approve sub-step when the allowance already covers the sale.
  pub skip_approval_when_allowance_sufficient: bool,
}

impl Default for OrchestratorSettings {
  fn default() -> Self {
    Self {
      eth_decimals: crate::domain::ETH_DECIMALS,
      token_input_decimals: 0,
      skip_approval_when_allowance_sufficient: false,
    }
  }
}

impl OrchestratorSettings {
  pub fn from_config(config: &AppConfig) -> Self {
    Self {
      eth_decimals: config.amounts.eth_decimals,
      token_input_decimals: config.amounts.token_input_decimals,
      skip_approval_when_allowance_sufficient: config
        .approvals
        .skip_approval_when_allowance_sufficient,
    }
  }
}

/// Receipts produced by a completed sell flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellReceipts {
  /// `None` when the approval was skipped.
  pub approval: Option<TransactionReceipt>,
  pub sale: TransactionReceipt,
}

/// Holds the in-flight slot.
///
/// `settle` publishes the outcome and leaves it in place. A guard
/// dropped before `settle` (the caller abandoned the flow future)
/// releases the slot back to `Idle`.
struct InFlight<'a> {
  state: &'a watch::Sender<OperationState>,
  settled: AtomicBool,
}

impl<'a> InFlight<'a> {
  fn new(state: &'a watch::Sender<OperationState>) -> Self {
    Self {
      state,
      settled: AtomicBool::new(false),
    }
  }

  fn enter(&self, state: OperationState) {
    self.state.send_replace(state);
  }

  /// Publish the terminal state.
  fn settle<T>(&self, result: &Result<T, ExchangeError>) {
    let terminal = if result.is_ok() {
      OperationState::Succeeded
    } else {
      OperationState::Failed
    };
    self.settled.store(true, Ordering::Release);
    self.state.send_replace(terminal);
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    if !self.settled.load(Ordering::Acquire) {
      self.state.send_replace(OperationState::Idle);
    }
  }
}

/// Sequences buy and sell flows against the chain client.
pub struct TransactionOrchestrator<C: ChainClient> {
  chain: Arc<C>,
  gateway: ContractGateway<C>,
  settings: OrchestratorSettings,
  /// Single mutator: only this struct writes the state.
  state: watch::Sender<OperationState>,
  last_error: Mutex<Option<ExchangeError>>,
  notifiers: Vec<Arc<dyn Notifier>>,
}

impl<C: ChainClient> TransactionOrchestrator<C> {
  /// Create an orchestrator in the `Idle` state.
  pub fn new(chain: Arc<C>, gateway: ContractGateway<C>, settings: OrchestratorSettings) -> Self {
    let (state, _) = watch::channel(OperationState::Idle);
    Self {
      chain,
      gateway,
      settings,
      state,
      last_error: Mutex::new(None),
      notifiers: Vec::new(),
    }
  }

  /// Add a notification sink.
  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifiers.push(notifier);
    self
  }

  /// Current operation state.
  pub fn state(&self) -> OperationState {
    *self.state.borrow()
  }

  /// Read-only view of the state for observers.
  pub fn subscribe(&self) -> watch::Receiver<OperationState> {
    self.state.subscribe()
  }

  /// Mark the published outcome as seen and return to `Idle`.
  ///
  /// No-op while a flow is in flight.
  pub fn acknowledge(&self) {
    self.state.send_if_modified(|state| {
      if matches!(state, OperationState::Succeeded | OperationState::Failed) {
        *state = OperationState::Idle;
        true
      } else {
        false
      }
    });
  }

  /// Error reported by the most recent flow, cleared on success.
  pub fn last_error(&self) -> Option<ExchangeError> {
    self.last_error.lock().ok().and_then(|guard| guard.clone())
  }

  /// Buy tokens for `eth_amount` (decimal ETH string).
  #[instrument(skip(self, account), fields(flow_id = %Uuid::new_v4(), flow = "buy"))]
  pub async fn buy(
    &self,
    account: Option<&Account>,
    eth_amount: &str,
  ) -> Result<TransactionReceipt, ExchangeError> {
    let result = self.run_buy(account, eth_amount).await;
    self.report(&result, |receipt| Notification::Purchased {
      tx_id: receipt.tx_id,
    });
    result
  }

  /// Sell `token_amount` tokens: approve the exchange, then sell.
  #[instrument(skip(self, account), fields(flow_id = %Uuid::new_v4(), flow = "sell"))]
  pub async fn sell(
    &self,
    account: Option<&Account>,
    token_amount: &str,
  ) -> Result<SellReceipts, ExchangeError> {
    let result = self.run_sell(account, token_amount).await;
    self.report(&result, |receipts| Notification::Sold {
      tx_id: receipts.sale.tx_id,
    });
    result
  }

  async fn run_buy(
    &self,
    account: Option<&Account>,
    eth_amount: &str,
  ) -> Result<TransactionReceipt, ExchangeError> {
    self.ensure_idle()?;
    let account = require_account(account)?;
    let value = parse_amount(eth_amount, self.settings.eth_decimals)?;

    let flight = self.begin()?;
    let request = self.gateway.build_buy(value);
    info!(account = %account, value = %value, "Starting buy flow");

    self.emit(Notification::PurchaseSubmitting);
    let result = self.execute(&flight, account, &request, FlowStep::Buy).await;
    flight.settle(&result);
    result
  }

  async fn run_sell(
    &self,
    account: Option<&Account>,
    token_amount: &str,
  ) -> Result<SellReceipts, ExchangeError> {
    self.ensure_idle()?;
    let account = require_account(account)?;
    let amount = parse_amount(token_amount, self.settings.token_input_decimals)?;

    let flight = self.begin()?;
    info!(account = %account, amount = %amount, "Starting sell flow");

    let result = self.sell_phases(&flight, account, amount).await;
    flight.settle(&result);
    result
  }

  /// Phase A (approve) then phase B (sell), strictly in order.
  async fn sell_phases(
    &self,
    flight: &InFlight<'_>,
    account: &Account,
    amount: Amount,
  ) -> Result<SellReceipts, ExchangeError> {
    let spender = self.gateway.exchange_address();

    let approval = if self.allowance_covers(account, amount).await {
      self.emit(Notification::ApprovalSkipped);
      None
    } else {
      let request = self.gateway.build_approve(spender, amount);
      self.emit(Notification::ApprovalSubmitting);
      Some(self.execute(flight, account, &request, FlowStep::Approve).await?)
    };

    let request = self.gateway.build_sell(amount);
    self.emit(Notification::SaleSubmitting);
    let sale = self.execute(flight, account, &request, FlowStep::Sell).await?;

    Ok(SellReceipts { approval, sale })
  }

  /// Submit one request and wait for a successful receipt.
  async fn execute(
    &self,
    flight: &InFlight<'_>,
    account: &Account,
    request: &TransactionRequest,
    step: FlowStep,
  ) -> Result<TransactionReceipt, ExchangeError> {
    flight.enter(OperationState::Submitting);
    let tx_id = self.chain.submit(account, request).await.map_err(|e| {
      warn!(step = %step, error = %e, "Submission failed");
      ExchangeError::chain_failure(step, ChainStage::Submission, None, format!("{e:#}"))
    })?;

    info!(step = %step, tx_id = %tx_id, method = request.method(), "Transaction submitted");
    flight.enter(OperationState::AwaitingConfirmation);

    let receipt = self.chain.wait_for_receipt(&tx_id).await.map_err(|e| {
      warn!(step = %step, tx_id = %tx_id, error = %e, "Receipt wait failed");
      ExchangeError::chain_failure(step, ChainStage::Confirmation, Some(tx_id), format!("{e:#}"))
    })?;

    if !receipt.success {
      warn!(step = %step, tx_id = %tx_id, "Transaction reverted");
      return Err(ExchangeError::chain_failure(
        step,
        ChainStage::Reverted,
        Some(tx_id),
        "transaction reverted",
      ));
    }

    info!(step = %step, tx_id = %tx_id, block = ?receipt.block_number, "Transaction confirmed");
    Ok(receipt)
  }

  /// Whether the optional short-circuit applies. Read failures fall
  /// back to approving.
  async fn allowance_covers(&self, account: &Account, amount: Amount) -> bool {
    if !self.settings.skip_approval_when_allowance_sufficient {
      return false;
    }

    match self
      .gateway
      .read_allowance(account.address(), self.gateway.exchange_address())
      .await
    {
      Ok(allowance) => allowance >= amount,
      Err(e) => {
        warn!(error = %e, "Allowance check failed, approving anyway");
        false
      }
    }
  }

  /// Cheap rejection before any validation work. A published outcome
  /// does not block the next flow.
  fn ensure_idle(&self) -> Result<(), ExchangeError> {
    if self.state.borrow().is_in_flight() {
      return Err(ExchangeError::OperationInProgress);
    }
    Ok(())
  }

  /// Atomically claim the in-flight slot.
  fn begin(&self) -> Result<InFlight<'_>, ExchangeError> {
    let claimed = self.state.send_if_modified(|state| {
      if state.is_in_flight() {
        false
      } else {
        *state = OperationState::Submitting;
        true
      }
    });

    if !claimed {
      return Err(ExchangeError::OperationInProgress);
    }
    Ok(InFlight::new(&self.state))
  }

  fn report<T>(&self, result: &Result<T, ExchangeError>, success: impl FnOnce(&T) -> Notification) {
    match result {
      Ok(value) => {
        self.set_last_error(None);
        self.emit(success(value));
      }
      Err(ExchangeError::OperationInProgress) => {
        // The running flow owns last_error.
        self.emit(Notification::Failed(ExchangeError::OperationInProgress));
      }
      Err(err) => {
        warn!(kind = err.kind(), error = %err, "Flow failed");
        self.set_last_error(Some(err.clone()));
        self.emit(Notification::Failed(err.clone()));
      }
    }
  }

  fn set_last_error(&self, error: Option<ExchangeError>) {
    if let Ok(mut guard) = self.last_error.lock() {
      *guard = error;
    }
  }

  fn emit(&self, notification: Notification) {
    for notifier in &self.notifiers {
      notifier.notify(&notification);
    }
  }
}

fn require_account(account: Option<&Account>) -> Result<&Account, ExchangeError> {
  account.ok_or(ExchangeError::PreconditionError(Precondition::AccountConnected))
}

fn parse_amount(input: &str, decimals: u8) -> Result<Amount, ExchangeError> {
  if input.trim().is_empty() {
    return Err(ExchangeError::PreconditionError(Precondition::AmountEntered));
  }
  to_base_units(input, decimals).map_err(|reason| ExchangeError::InvalidAmount {
    input: input.to_string(),
    reason,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::AmountError;

  #[test]
  fn test_blank_amount_is_precondition() {
    assert_eq!(
      parse_amount("  ", 18),
      Err(ExchangeError::PreconditionError(Precondition::AmountEntered))
    );
  }

  #[test]
  fn test_bad_amount_is_invalid() {
    assert_eq!(
      parse_amount("-1", 18),
      Err(ExchangeError::InvalidAmount {
        input: "-1".to_string(),
        reason: AmountError::Negative,
      })
    );
  }

  #[test]
  fn test_missing_account() {
    assert_eq!(
      require_account(None),
      Err(ExchangeError::PreconditionError(Precondition::AccountConnected))
    );
  }

  #[test]
  fn test_settled_guard_keeps_outcome() {
    let (state, _) = watch::channel(OperationState::Idle);
    {
      let flight = InFlight::new(&state);
      flight.enter(OperationState::AwaitingConfirmation);
      assert_eq!(*state.borrow(), OperationState::AwaitingConfirmation);
      flight.settle::<()>(&Err(ExchangeError::OperationInProgress));
      assert_eq!(*state.borrow(), OperationState::Failed);
    }
    assert_eq!(*state.borrow(), OperationState::Failed);
  }

  #[test]
  fn test_abandoned_guard_releases_to_idle() {
    let (state, _) = watch::channel(OperationState::Idle);
    {
      let flight = InFlight::new(&state);
      flight.enter(OperationState::Submitting);
    }
    assert_eq!(*state.borrow(), OperationState::Idle);
  }
}
