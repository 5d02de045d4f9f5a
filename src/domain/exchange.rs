//! Exchange state snapshots.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::amount::{Amount, ETH_DECIMALS, from_base_units};

/// Fixed addresses of the two contracts the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractAddresses {
    /// Exchange contract; also the spender of sell approvals.
    pub exchange: Address,
    /// ERC-20 token contract.
    pub token: Address,
}

/// Result of `getExchangeInfo()` at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangeInfo {
    /// ETH held by the exchange contract.
    pub eth_reserve: Amount,
    /// Tokens held by the exchange contract.
    pub token_reserve: Amount,
    /// Token base units per whole ETH.
    pub rate: Amount,
}

impl ExchangeInfo {
    /// Whole tokens per ETH, as shown to the user.
    ///
    /// The contract reports the rate scaled by 10^18; the remainder is
    /// discarded the same way integer division does on-chain.
    pub fn display_rate(&self) -> String {
        self.rate.whole_units(ETH_DECIMALS).to_string()
    }
}

/// Exchange and account balances read together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeSnapshot {
    pub exchange_info: ExchangeInfo,
    /// Account ETH balance in wei.
    pub account_base_balance: Amount,
    /// Account token balance in token base units.
    pub account_token_balance: Amount,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeSnapshot {
    /// Human-readable summary lines for CLI output.
    ///
    /// Decimals must be the same ones used to parse user input.
    pub fn display_lines(&self, eth_decimals: u8, token_decimals: u8, precision: u8) -> Vec<String> {
        vec![
            format!(
                "Exchange ETH reserve:   {} ETH",
                from_base_units(self.exchange_info.eth_reserve, eth_decimals, precision)
            ),
            format!(
                "Exchange token reserve: {} tokens",
                from_base_units(self.exchange_info.token_reserve, token_decimals, precision)
            ),
            format!(
                "Exchange rate:          {} tokens/ETH",
                self.exchange_info.display_rate()
            ),
            format!(
                "Your ETH balance:       {} ETH",
                from_base_units(self.account_base_balance, eth_decimals, precision)
            ),
            format!(
                "Your token balance:     {} tokens",
                from_base_units(self.account_token_balance, token_decimals, precision)
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::*;

    fn info(rate: U256) -> ExchangeInfo {
        ExchangeInfo {
            eth_reserve: Amount::from(100u64),
            token_reserve: Amount::from(5000u64),
            rate: Amount::new(rate),
        }
    }

    #[test]
    fn test_display_rate_divides_scale() {
        let rate = U256::from(50u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(info(rate).display_rate(), "50");
    }

    #[test]
    fn test_display_rate_truncates() {
        // 2.5 tokens/ETH shows as 2.
        let rate = U256::from(2_500_000_000_000_000_000u64);
        assert_eq!(info(rate).display_rate(), "2");
    }

    #[test]
    fn test_snapshot_display_lines() {
        let snapshot = ExchangeSnapshot {
            exchange_info: info(U256::from(50u64) * U256::from(10u64).pow(U256::from(18u64))),
            account_base_balance: Amount::from(1_500_000_000_000_000_000u64),
            account_token_balance: Amount::ZERO,
            fetched_at: Utc::now(),
        };
        let lines = snapshot.display_lines(18, 18, 6);
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("50 tokens/ETH"));
        assert!(lines[3].contains("1.5 ETH"));
    }

    #[test]
    fn test_display_lines_follow_configured_eth_decimals() {
        let snapshot = ExchangeSnapshot {
            exchange_info: info(U256::ZERO),
            account_base_balance: Amount::from(1_500_000_000u64),
            account_token_balance: Amount::ZERO,
            fetched_at: Utc::now(),
        };
        let lines = snapshot.display_lines(9, 18, 6);
        assert!(lines[3].contains("1.5 ETH"), "{}", lines[3]);
        // 100 base units at 9 decimals truncate to zero at 6 digits.
        assert!(lines[0].ends_with(" 0 ETH"), "{}", lines[0]);
    }
}
