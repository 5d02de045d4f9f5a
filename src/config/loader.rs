//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::ContractAddresses;
use crate::domain::amount::MAX_DECIMALS;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    chain_id = config.network.chain_id,
    exchange = %config.contracts.exchange,
    token = %config.contracts.token,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  Ok(config)
}

impl AppConfig {
  /// Parsed contract addresses.
  pub fn contract_addresses(&self) -> Result<ContractAddresses> {
    Ok(ContractAddresses {
      exchange: parse_address("contracts.exchange", &self.contracts.exchange)?,
      token: parse_address("contracts.token", &self.contracts.token)?,
    })
  }
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
  value
    .parse()
    .with_context(|| format!("Invalid address for {field}: {value}"))
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty RPC endpoint and non-zero chain ID
/// - Parseable, distinct contract addresses
/// - Decimals that fit a 256-bit scale factor
/// - Positive poll interval, timeout and refresh interval
fn validate_config(config: &AppConfig) -> Result<()> {
  // Network validation
  anyhow::ensure!(
    !config.network.rpc_url.is_empty(),
    "network.rpc_url must not be empty"
  );
  anyhow::ensure!(config.network.chain_id > 0, "network.chain_id must be positive");
  anyhow::ensure!(
    config.network.receipt_poll_interval_ms > 0,
    "network.receipt_poll_interval_ms must be positive"
  );
  anyhow::ensure!(
    config.network.receipt_timeout_secs > 0,
    "network.receipt_timeout_secs must be positive"
  );

  // Contract validation
  let addresses = config.contract_addresses()?;
  anyhow::ensure!(
    addresses.exchange != addresses.token,
    "contracts.exchange and contracts.token must differ, both are {}",
    addresses.exchange
  );
  anyhow::ensure!(
    !addresses.exchange.is_zero() && !addresses.token.is_zero(),
    "Contract addresses must not be the zero address"
  );

  // Amount validation
  for (field, decimals) in [
    ("amounts.eth_decimals", config.amounts.eth_decimals),
    ("amounts.token_decimals", config.amounts.token_decimals),
    ("amounts.token_input_decimals", config.amounts.token_input_decimals),
  ] {
    anyhow::ensure!(
      decimals <= MAX_DECIMALS,
      "{field} must be at most {MAX_DECIMALS}, got {decimals}"
    );
  }
  anyhow::ensure!(
    config.amounts.token_input_decimals <= config.amounts.token_decimals,
    "amounts.token_input_decimals ({}) cannot exceed amounts.token_decimals ({})",
    config.amounts.token_input_decimals,
    config.amounts.token_decimals
  );

  // Metrics validation
  anyhow::ensure!(
    config.metrics.refresh_interval_secs > 0,
    "metrics.refresh_interval_secs must be positive"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.network.chain_id, 11_155_111);
    assert_eq!(config.amounts.eth_decimals, 18);
    assert_eq!(config.amounts.token_input_decimals, 0);
    assert!(!config.approvals.skip_approval_when_allowance_sufficient);

    let addresses = config.contract_addresses().unwrap();
    assert_eq!(
      addresses.exchange.to_string().to_lowercase(),
      "0xd8c5d574f33eeb294a9d03c5d9eaef78ae4b8007"
    );
  }

  #[test]
  fn test_overrides() {
    let config = parse_config(
      r#"
        [network]
        rpc_url = "http://localhost:8545"
        chain_id = 31337

        [amounts]
        token_input_decimals = 18

        [approvals]
        skip_approval_when_allowance_sufficient = true
      "#,
    )
    .unwrap();
    assert_eq!(config.network.chain_id, 31337);
    assert_eq!(config.amounts.token_input_decimals, 18);
    assert!(config.approvals.skip_approval_when_allowance_sufficient);
  }

  #[test]
  fn test_rejects_bad_address() {
    let err = parse_config(
      r#"
        [contracts]
        exchange = "0xnot-an-address"
      "#,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("contracts.exchange"));
  }

  #[test]
  fn test_rejects_same_contracts() {
    let result = parse_config(
      r#"
        [contracts]
        exchange = "0xb2f902825D87efEE4E3eF6873b071F7FA86ca9aB"
        token = "0xb2f902825D87efEE4E3eF6873b071F7FA86ca9aB"
      "#,
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_rejects_input_decimals_above_token_decimals() {
    let result = parse_config(
      r#"
        [amounts]
        token_decimals = 6
        token_input_decimals = 18
      "#,
    );
    assert!(result.is_err());
  }
}
