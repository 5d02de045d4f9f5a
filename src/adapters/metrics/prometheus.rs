//! Prometheus Metrics Registry - Client Observability
//!
//! Counts every notification the orchestrator emits (one series per
//! outcome kind) and tracks the latest exchange snapshot as gauges.
//! Exported on `/metrics` by the health server.

use prometheus::{Encoder, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

use crate::domain::{ExchangeSnapshot, Notification, from_base_units};
use crate::ports::notifier::Notifier;

/// Centralized Prometheus metrics for the exchange client.
///
/// All metrics follow the naming convention `token_exchange_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Notifications emitted, by level and kind.
    pub notifications: IntCounterVec,
    /// Exchange reserves in whole units, by asset.
    pub reserves: GaugeVec,
    /// Account balances in whole units, by asset.
    pub account_balance: GaugeVec,
    /// Tokens per ETH.
    pub rate: prometheus::Gauge,
    /// Failed snapshot refreshes.
    pub refresh_failures: IntCounter,
    /// Decimals used when converting gauges.
    eth_decimals: u8,
    token_decimals: u8,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new(eth_decimals: u8, token_decimals: u8) -> anyhow::Result<Self> {
        let registry = Registry::new();

        let notifications = IntCounterVec::new(
            Opts::new(
                "token_exchange_notifications_total",
                "Flow notifications emitted, by level and kind",
            ),
            &["level", "kind"],
        )?;

        let reserves = GaugeVec::new(
            Opts::new(
                "token_exchange_reserve",
                "Exchange contract reserves in whole units",
            ),
            &["asset"],
        )?;

        let account_balance = GaugeVec::new(
            Opts::new(
                "token_exchange_account_balance",
                "Connected account balances in whole units",
            ),
            &["asset"],
        )?;

        let rate = prometheus::Gauge::new(
            "token_exchange_rate_tokens_per_eth",
            "Exchange rate in whole tokens per ETH",
        )?;

        let refresh_failures = IntCounter::new(
            "token_exchange_refresh_failures_total",
            "Snapshot refreshes that failed",
        )?;

        // Register all metrics
        registry.register(Box::new(notifications.clone()))?;
        registry.register(Box::new(reserves.clone()))?;
        registry.register(Box::new(account_balance.clone()))?;
        registry.register(Box::new(rate.clone()))?;
        registry.register(Box::new(refresh_failures.clone()))?;

        Ok(Self {
            registry,
            notifications,
            reserves,
            account_balance,
            rate,
            refresh_failures,
            eth_decimals,
            token_decimals,
        })
    }

    /// Update gauges from a fresh snapshot.
    pub fn record_snapshot(&self, snapshot: &ExchangeSnapshot) {
        let info = &snapshot.exchange_info;
        let eth = |amount| gauge_value(from_base_units(amount, self.eth_decimals, 9));
        let token = |amount| gauge_value(from_base_units(amount, self.token_decimals, 9));

        self.reserves.with_label_values(&["eth"]).set(eth(info.eth_reserve));
        self.reserves
            .with_label_values(&["token"])
            .set(token(info.token_reserve));
        self.account_balance
            .with_label_values(&["eth"])
            .set(eth(snapshot.account_base_balance));
        self.account_balance
            .with_label_values(&["token"])
            .set(token(snapshot.account_token_balance));
        self.rate.set(gauge_value(info.display_rate()));
    }

    pub fn record_refresh_failure(&self) {
        self.refresh_failures.inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Notifier for MetricsRegistry {
    fn notify(&self, notification: &Notification) {
        let level = notification.level().to_string();
        self.notifications
            .with_label_values(&[level.as_str(), notification.kind()])
            .inc();
    }
}

/// Gauges are display values; precision loss past 2^53 is acceptable here.
fn gauge_value(decimal: String) -> f64 {
    decimal.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use chrono::Utc;

    use super::*;
    use crate::domain::{Amount, ExchangeError, ExchangeInfo};

    #[test]
    fn test_counts_notifications_by_kind() {
        let metrics = MetricsRegistry::new(18, 18).unwrap();
        metrics.notify(&Notification::PurchaseSubmitting);
        metrics.notify(&Notification::Failed(ExchangeError::OperationInProgress));
        metrics.notify(&Notification::Failed(ExchangeError::OperationInProgress));

        let in_progress = metrics
            .notifications
            .with_label_values(&["ERROR", "operation_in_progress"])
            .get();
        assert_eq!(in_progress, 2);

        let text = metrics.render();
        assert!(text.contains("token_exchange_notifications_total"));
    }

    #[test]
    fn test_records_snapshot_gauges() {
        let metrics = MetricsRegistry::new(18, 18).unwrap();
        let wei = U256::from(10u64).pow(U256::from(18u64));
        let snapshot = ExchangeSnapshot {
            exchange_info: ExchangeInfo {
                eth_reserve: Amount::new(U256::from(3u64) * wei),
                token_reserve: Amount::new(U256::from(5000u64) * wei),
                rate: Amount::new(U256::from(50u64) * wei),
            },
            account_base_balance: Amount::new(wei / U256::from(2u64)),
            account_token_balance: Amount::ZERO,
            fetched_at: Utc::now(),
        };

        metrics.record_snapshot(&snapshot);
        assert_eq!(metrics.rate.get(), 50.0);
        assert_eq!(metrics.reserves.with_label_values(&["eth"]).get(), 3.0);
        assert_eq!(metrics.account_balance.with_label_values(&["eth"]).get(), 0.5);
    }

    #[test]
    fn test_eth_gauges_use_configured_decimals() {
        let metrics = MetricsRegistry::new(6, 18).unwrap();
        let snapshot = ExchangeSnapshot {
            exchange_info: ExchangeInfo {
                eth_reserve: Amount::from(2_000_000u64),
                token_reserve: Amount::ZERO,
                rate: Amount::ZERO,
            },
            account_base_balance: Amount::from(250_000u64),
            account_token_balance: Amount::ZERO,
            fetched_at: Utc::now(),
        };

        metrics.record_snapshot(&snapshot);
        assert_eq!(metrics.reserves.with_label_values(&["eth"]).get(), 2.0);
        assert_eq!(metrics.account_balance.with_label_values(&["eth"]).get(), 0.25);
    }
}
