//! Contract Validator - On-chain Verification at Startup
//!
//! Validates that the configured exchange and token addresses point
//! to deployed contracts on the target network (code exists, not an
//! EOA). A typo in `config.toml` then fails at startup instead of as
//! a silently empty read or a transfer to nowhere.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::Provider;
use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::domain::ContractAddresses;

/// Result of validating a single contract.
#[derive(Debug)]
pub struct ValidationResult {
    /// Contract name for logging.
    pub name: &'static str,
    /// Address that was validated.
    pub address: Address,
    /// Whether the contract has deployed code.
    pub has_code: bool,
}

/// Validates contract addresses against on-chain state.
pub struct ContractValidator {
    /// Alloy provider for on-chain queries.
    provider: Arc<dyn Provider + Send + Sync>,
}

impl ContractValidator {
    /// Create a new validator with the given provider.
    pub fn new(provider: Arc<dyn Provider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Validate both contracts.
    ///
    /// Returns an error if either address has no deployed code; both
    /// are required for every flow.
    #[instrument(skip(self))]
    pub async fn validate_all(&self, addresses: &ContractAddresses) -> Result<Vec<ValidationResult>> {
        let mut results = Vec::with_capacity(2);

        for (name, address) in [("Exchange", addresses.exchange), ("Token", addresses.token)] {
            let result = self.validate_contract(name, address).await?;

            if result.has_code {
                info!(contract = name, address = %address, "Contract validated: code exists on-chain");
            } else {
                warn!(contract = name, address = %address, "Contract has no code, possible misconfiguration");
            }

            results.push(result);
        }

        if let Some(missing) = results.iter().find(|r| !r.has_code) {
            anyhow::bail!(
                "{} contract at {} has no deployed code, check config.toml",
                missing.name,
                missing.address
            );
        }

        Ok(results)
    }

    /// Validate a single contract by checking if code exists at the address.
    async fn validate_contract(&self, name: &'static str, address: Address) -> Result<ValidationResult> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .with_context(|| format!("Failed to query code for {name}"))?;

        Ok(ValidationResult {
            name,
            address,
            has_code: !code.is_empty(),
        })
    }
}
