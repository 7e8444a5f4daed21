//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
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

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        desk = %config.desk.name,
        chain_id = config.chain.chain_id,
        slippage_bps = config.orders.default_slippage_bps,
        fee_bps = ?config.execution.protocol_fee_bps,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-zero chain id and non-empty RPC endpoint
/// - Parseable contract addresses
/// - Basis-point values inside (0, 10000)
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        config.chain.chain_id > 0,
        "chain_id must be non-zero"
    );
    anyhow::ensure!(
        !config.chain.rpc_url.is_empty(),
        "RPC URL must not be empty"
    );

    for (name, value) in [
        ("core", &config.execution.core),
        ("limit_module", &config.execution.limit_module),
        ("stop_limit_module", &config.execution.stop_limit_module),
        ("stop_loss_module", &config.execution.stop_loss_module),
    ] {
        value.parse::<Address>().with_context(|| {
            format!("Execution address {name} is not a valid address: {value}")
        })?;
    }
    if let Some(handler) = &config.execution.handler {
        handler.parse::<Address>().with_context(|| {
            format!("Handler address is not a valid address: {handler}")
        })?;
    }

    anyhow::ensure!(
        config.orders.default_slippage_bps < 10_000,
        "default_slippage_bps must be below 10000, got {}",
        config.orders.default_slippage_bps
    );
    if let Some(fee) = config.execution.protocol_fee_bps {
        anyhow::ensure!(
            fee < 10_000,
            "protocol_fee_bps must be below 10000, got {fee}"
        );
    }

    anyhow::ensure!(
        config.gas.cancel_gas_limit > 21_000,
        "cancel_gas_limit must exceed the base transaction cost"
    );

    Ok(())
}
