//! limit-order-desk — Entry Point
//!
//! Initializes configuration, logging, the chain connection and the
//! order history, then holds the desk ready until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect EVM provider (chain-id check)
//! 4. Build signer dispatcher from DESK_PRIVATE_KEY
//! 5. Open order history, report open orders
//! 6. Build execution core client + orchestrators
//! 7. Standby heartbeat until SIGINT → clean shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::chain::{EvmProvider, SignerDispatcher};
use adapters::execution::CoreClient;
use adapters::persistence::FileHistoryStore;
use usecases::cancel::CancelOrchestrator;
use usecases::flight::SingleFlight;
use usecases::submit::SubmitOrchestrator;
use usecases::ChainContext;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.desk.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.desk.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.chain.chain_id,
        dry_run = config.desk.dry_run,
        "Starting limit-order desk"
    );

    // ── 3. Connect to the chain, validating its id ──────────
    let provider = Arc::new(
        EvmProvider::connect(&config.chain)
            .await
            .context("Failed to connect to RPC")?,
    );

    // ── 4. Wallet-backed dispatcher from env signing key ────
    let dispatcher = Arc::new(
        SignerDispatcher::connect(&config.chain)
            .context("Failed to build signer dispatcher")?,
    );
    let context = ChainContext::new(provider.chain_id(), dispatcher.account());

    // ── 5. Open the order history ───────────────────────────
    let history = Arc::new(
        FileHistoryStore::open(&config.persistence.data_dir)
            .await
            .context("Failed to open order history")?,
    );
    let open = history.open_orders().await;
    info!(open_orders = open.len(), "Order history ready");

    // ── 6. Execution client + orchestrators ─────────────────
    let client = Arc::new(
        CoreClient::new(&config.execution, provider.chain_id())
            .context("Failed to build execution client")?,
    );
    let flight = Arc::new(SingleFlight::new());
    let _submit = SubmitOrchestrator::new(
        Arc::clone(&client),
        Arc::clone(&dispatcher),
        Arc::clone(&history),
        context,
        config.gas.default_gas_price_wei(),
        Arc::clone(&flight),
    );
    let _cancel = CancelOrchestrator::new(
        Arc::clone(&client),
        Arc::clone(&dispatcher),
        Arc::clone(&history),
        context,
        Some(config.gas.cancel_gas_limit),
        Arc::clone(&flight),
    );

    if config.desk.dry_run {
        warn!("Dry-run mode — drafts derive and validate but nothing dispatches");
    }

    info!("Desk ready — awaiting order-entry frontend");

    // ── 7. Standby heartbeat until SIGINT ───────────────────
    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("SIGINT received, shutting down");
                break;
            }
            _ = tokio::time::sleep(std::time::Duration::from_secs(60)) => {
                let open = history.open_orders().await;
                let healthy = provider.is_healthy().await;
                info!(open_orders = open.len(), healthy, "Desk heartbeat");
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}
