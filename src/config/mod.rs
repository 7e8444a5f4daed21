//! Configuration Module - TOML-based Desk Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variables for secrets (the signing key never lives in
//! the file). All contract addresses and chain parameters are
//! externalized here - nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level desk configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the desk begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Desk identity and metadata.
    pub desk: DeskConfig,
    /// Target chain parameters.
    pub chain: ChainConfig,
    /// Execution-network contract addresses and fee model.
    pub execution: ExecutionConfig,
    /// Order-entry defaults.
    #[serde(default)]
    pub orders: OrdersConfig,
    /// Gas defaults for dispatch.
    #[serde(default)]
    pub gas: GasConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Desk identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Human-readable desk name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Enable dry-run mode (no real transactions).
    #[serde(default)]
    pub dry_run: bool,
}

/// Target chain configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Expected chain id; validated against the RPC at startup.
    pub chain_id: u64,
    /// HTTP RPC endpoint.
    pub rpc_url: String,
}

/// Execution-network contract configuration.
///
/// Addresses are ALWAYS in config - never hardcoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Core vault contract.
    pub core: String,
    /// Module executing plain limit orders.
    pub limit_module: String,
    /// Module executing stop-limit orders.
    pub stop_limit_module: String,
    /// Module executing stop-loss orders.
    pub stop_loss_module: String,
    /// DEX handler the modules route through, if one is deployed.
    pub handler: Option<String>,
    /// Protocol fee in basis points; omit on chains that charge none.
    pub protocol_fee_bps: Option<u32>,
}

/// Order-entry defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    /// Default slippage tolerance in basis points.
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            default_slippage_bps: default_slippage_bps(),
        }
    }
}

/// Gas defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GasConfig {
    /// Default gas price in gwei when the caller supplies none.
    pub default_gas_price_gwei: Option<u64>,
    /// Gas limit applied to cancellations (estimation fails on some
    /// handler contracts).
    #[serde(default = "default_cancel_gas_limit")]
    pub cancel_gas_limit: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            default_gas_price_gwei: None,
            cancel_gas_limit: default_cancel_gas_limit(),
        }
    }
}

impl GasConfig {
    /// Default gas price in wei, ready for transaction overrides.
    pub fn default_gas_price_wei(&self) -> Option<u128> {
        self.default_gas_price_gwei
            .map(|gwei| u128::from(gwei) * 1_000_000_000)
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Directory for the order history file.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_slippage_bps() -> u32 {
    100
}

fn default_cancel_gas_limit() -> u64 {
    600_000
}

fn default_data_dir() -> String {
    "data".to_string()
}
