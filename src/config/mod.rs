//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Network endpoint, contract addresses and amount formatting live
//! here - nothing is hardcoded in the usecases layer. The signing key
//! is never part of the config; it comes from `PRIVATE_KEY`.

pub mod loader;

use serde::Deserialize;

/// Top-level client configuration.
///
/// Loaded from `config.toml` at startup. Every section has defaults,
/// so an empty file targets the public Sepolia deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Client identity and logging.
  #[serde(default)]
  pub client: ClientConfig,
  /// Target network.
  #[serde(default)]
  pub network: NetworkConfig,
  /// Exchange and token contract addresses.
  #[serde(default)]
  pub contracts: ContractConfig,
  /// Decimal handling for input and display.
  #[serde(default)]
  pub amounts: AmountConfig,
  /// Approval behaviour for the sell flow.
  #[serde(default)]
  pub approvals: ApprovalConfig,
  /// Metrics and health endpoints for `watch`.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  /// Human-readable client name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
  /// JSON-RPC endpoint.
  #[serde(default = "default_rpc_url")]
  pub rpc_url: String,
  /// Expected chain ID, checked at startup.
  #[serde(default = "default_chain_id")]
  pub chain_id: u64,
  /// Delay between receipt polls (milliseconds).
  #[serde(default = "default_poll_interval")]
  pub receipt_poll_interval_ms: u64,
  /// Give up waiting for a receipt after this long (seconds).
  #[serde(default = "default_receipt_timeout")]
  pub receipt_timeout_secs: u64,
}

/// Contract addresses.
///
/// Kept as strings so a typo fails in validation with the field name
/// rather than as an opaque serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
  /// Exchange contract (`buyTokens`, `sellTokens`, `getExchangeInfo`).
  #[serde(default = "default_exchange")]
  pub exchange: String,
  /// ERC-20 token contract.
  #[serde(default = "default_token")]
  pub token: String,
}

/// Decimal handling.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AmountConfig {
  /// Decimals of the base currency.
  #[serde(default = "default_decimals")]
  pub eth_decimals: u8,
  /// Decimals of the token.
  #[serde(default = "default_decimals")]
  pub token_decimals: u8,
  /// Decimals applied to sell amounts typed by the user.
  ///
  /// `0` means the input is already in token base units.
  #[serde(default)]
  pub token_input_decimals: u8,
  /// Fractional digits shown in balances.
  #[serde(default = "default_display_precision")]
  pub display_precision: u8,
}

/// Approval configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ApprovalConfig {
  /// Skip the approve transaction when the current allowance
  /// already covers the sale.
  #[serde(default)]
  pub skip_approval_when_allowance_sufficient: bool,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve `/live`, `/ready` and `/metrics` while watching.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Interval between balance refreshes in `watch` (seconds).
  #[serde(default = "default_refresh_interval")]
  pub refresh_interval_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

impl Default for NetworkConfig {
  fn default() -> Self {
    Self {
      rpc_url: default_rpc_url(),
      chain_id: default_chain_id(),
      receipt_poll_interval_ms: default_poll_interval(),
      receipt_timeout_secs: default_receipt_timeout(),
    }
  }
}

impl Default for ContractConfig {
  fn default() -> Self {
    Self {
      exchange: default_exchange(),
      token: default_token(),
    }
  }
}

impl Default for AmountConfig {
  fn default() -> Self {
    Self {
      eth_decimals: default_decimals(),
      token_decimals: default_decimals(),
      token_input_decimals: 0,
      display_precision: default_display_precision(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
      refresh_interval_secs: default_refresh_interval(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "token-exchange".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_rpc_url() -> String {
  "https://ethereum-sepolia-rpc.publicnode.com".to_string()
}

fn default_chain_id() -> u64 {
  11_155_111 // Sepolia
}

fn default_poll_interval() -> u64 {
  1_000
}

fn default_receipt_timeout() -> u64 {
  300
}

fn default_exchange() -> String {
  "0xD8c5d574f33EeB294a9d03C5D9EaeF78aE4b8007".to_string()
}

fn default_token() -> String {
  "0xb2f902825D87efEE4E3eF6873b071F7FA86ca9aB".to_string()
}

fn default_decimals() -> u8 {
  18
}

fn default_display_precision() -> u8 {
  crate::domain::DEFAULT_DISPLAY_PRECISION
}

fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_refresh_interval() -> u64 {
  15
}
