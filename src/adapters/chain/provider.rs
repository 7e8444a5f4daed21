//! EVM RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the target EVM chain via alloy-rs.
//! Validates RPC connectivity and chain id at startup and exposes a
//! shared provider instance for all on-chain operations.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type. We store it as a type-erased `dyn Provider` to keep
//! the API clean across the adapter layer.

use std::sync::Arc;

use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::http::ReqwestTransport;
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::ChainConfig;

/// Shared EVM RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling.
pub struct EvmProvider {
    /// The alloy HTTP provider (type-erased over the HTTP transport).
    provider: Arc<dyn Provider<ReqwestTransport> + Send + Sync>,
    /// Chain id confirmed at startup.
    chain_id: u64,
}

impl EvmProvider {
    /// Connect to the configured RPC and validate its chain id.
    ///
    /// The URL and expected chain id come from `config.toml` (never
    /// hardcoded). A mismatched chain id aborts startup.
    #[instrument(skip_all)]
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        // alloy 0.9: on_http() is synchronous, returns impl Provider
        let provider = ProviderBuilder::new()
            .on_http(config.rpc_url.parse().context("Invalid RPC URL")?);

        let provider: Arc<dyn Provider<ReqwestTransport> + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != config.chain_id {
            anyhow::bail!(
                "Expected chain_id={}, RPC reports {chain_id}",
                config.chain_id
            );
        }

        info!(chain_id, "Connected to EVM RPC");

        Ok(Self { provider, chain_id })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider<ReqwestTransport> + Send + Sync> {
        Arc::clone(&self.provider)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
