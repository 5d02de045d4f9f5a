//! Token Exchange Client - Entry Point
//!
//! Wiring sequence:
//! 1. Parse CLI, load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Load the signing key from PRIVATE_KEY
//! 4. Connect the RPC provider (chain ID checked) and validate contracts
//! 5. Build gateway, orchestrator, state reader and session
//! 6. Connect the wallet and run the requested command

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use token_exchange_client::adapters::chain::{
    AlloyChainClient, ChainProvider, ContractValidator, LocalKeyWallet,
};
use token_exchange_client::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use token_exchange_client::adapters::notify::ConsoleNotifier;
use token_exchange_client::config::{self, AppConfig};
use token_exchange_client::domain::{ExchangeSnapshot, from_base_units};
use token_exchange_client::ports::chain_client::ChainClient;
use token_exchange_client::ports::notifier::Notifier;
use token_exchange_client::usecases::{
    ContractGateway, ExchangeStateReader, OrchestratorSettings, Session, TransactionOrchestrator,
};

type ClientSession = Session<AlloyChainClient, LocalKeyWallet>;

#[derive(Parser, Debug)]
#[command(name = "token-exchange", version, about = "Buy and sell exchange tokens with ETH")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, short, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show exchange reserves, rate and your balances.
    Info {
        /// Print the snapshot as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Buy tokens, paying the given amount of ETH (e.g. 0.01).
    Buy { eth_amount: String },
    /// Sell tokens: approve the exchange, then sell.
    Sell { token_amount: String },
    /// Refresh balances periodically and serve health/metrics endpoints.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&cli.config).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.client.log_level)),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!(
        name = %config.client.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.network.chain_id,
        "Starting token exchange client"
    );

    // ── 3. Signing key ──────────────────────────────────────
    let wallet = Arc::new(LocalKeyWallet::from_env().context("Failed to load signing key")?);

    // ── 4. Provider + contract validation ───────────────────
    let provider = Arc::new(
        ChainProvider::connect(&config.network, Some(wallet.ethereum_wallet()))
            .await
            .context("Failed to connect to chain")?,
    );
    let addresses = config.contract_addresses()?;
    ContractValidator::new(provider.inner())
        .validate_all(&addresses)
        .await
        .context("Contract validation failed")?;

    // ── 5. Use cases ────────────────────────────────────────
    let chain = Arc::new(AlloyChainClient::new(Arc::clone(&provider), &config.network));
    let gateway = ContractGateway::new(Arc::clone(&chain), addresses);
    let metrics = Arc::new(MetricsRegistry::new(config.amounts.eth_decimals, config.amounts.token_decimals)?);

    let console: Arc<dyn Notifier> = match cli.command {
        Command::Watch => Arc::new(ConsoleNotifier::quiet()),
        _ => Arc::new(ConsoleNotifier::new()),
    };
    let orchestrator = TransactionOrchestrator::new(
        Arc::clone(&chain),
        gateway.clone(),
        OrchestratorSettings::from_config(&config),
    )
    .with_notifier(Arc::clone(&console))
    .with_notifier(Arc::clone(&metrics) as _);
    let reader = ExchangeStateReader::new(Arc::clone(&chain), gateway)
        .with_notifier(console)
        .with_notifier(Arc::clone(&metrics) as _);
    let session = Session::new(Arc::clone(&wallet), orchestrator, reader);

    // ── 6. Connect and dispatch ─────────────────────────────
    session.connect().await?;

    match cli.command {
        Command::Info { json } => {
            let snapshot = session.refresh().await?;
            print_snapshot(&snapshot, &config, json)?;
        }
        Command::Buy { eth_amount } => {
            let receipt = session.buy(&eth_amount).await?;
            info!(tx_id = %receipt.tx_id, "Buy complete");
            refresh_after_flow(&session, &config).await;
        }
        Command::Sell { token_amount } => {
            let receipts = session.sell(&token_amount).await?;
            info!(
                approval = ?receipts.approval.as_ref().map(|r| r.tx_id),
                sale = %receipts.sale.tx_id,
                "Sell complete"
            );
            refresh_after_flow(&session, &config).await;
        }
        Command::Watch => watch(&session, chain.as_ref(), &config, metrics).await?,
    }

    session.disconnect().await?;
    Ok(())
}

/// Re-read balances after a flow; a failed read is not fatal.
async fn refresh_after_flow(session: &ClientSession, config: &AppConfig) {
    match session.refresh().await {
        Ok(snapshot) => {
            if let Err(e) = print_snapshot(&snapshot, config, false) {
                warn!(error = %e, "Failed to print snapshot");
            }
        }
        Err(e) => warn!(error = %e, "Balances could not be refreshed"),
    }
}

fn print_snapshot(snapshot: &ExchangeSnapshot, config: &AppConfig, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?
        );
        return Ok(());
    }

    let amounts = &config.amounts;
    for line in snapshot.display_lines(amounts.eth_decimals, amounts.token_decimals, amounts.display_precision) {
        println!("{line}");
    }
    Ok(())
}

/// Refresh on an interval until SIGINT, serving health/metrics.
async fn watch(
    session: &ClientSession,
    chain: &AlloyChainClient,
    config: &AppConfig,
    metrics: Arc<MetricsRegistry>,
) -> Result<()> {
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());

    let server_handle = if config.metrics.enabled {
        let server = HealthServer::new(
            Arc::clone(&health),
            Arc::clone(&metrics),
            config.metrics.bind_address.clone(),
        );
        let shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(config.metrics.refresh_interval_secs));
    info!(interval_secs = config.metrics.refresh_interval_secs, "Watching exchange");

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("SIGINT received, stopping watch");
                break;
            }
            _ = ticker.tick() => {
                match session.refresh().await {
                    Ok(snapshot) => {
                        health.set_refresh_ok(true);
                        metrics.record_snapshot(&snapshot);
                        info!(
                            rate = %snapshot.exchange_info.display_rate(),
                            eth = %from_base_units(snapshot.account_base_balance, config.amounts.eth_decimals, config.amounts.display_precision),
                            tokens = %from_base_units(snapshot.account_token_balance, config.amounts.token_decimals, config.amounts.display_precision),
                            "Snapshot refreshed"
                        );
                    }
                    Err(e) => {
                        health.set_refresh_ok(false);
                        metrics.record_refresh_failure();
                        let stale = session.latest_snapshot().await.map(|s| s.fetched_at);
                        let rpc_healthy = chain.is_healthy().await;
                        warn!(error = %e, last_good = ?stale, rpc_healthy, "Refresh failed, keeping last snapshot");
                    }
                }
            }
        }
    }

    let _ = shutdown_tx.send(());
    if let Some(handle) = server_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Watch stopped");
    Ok(())
}
