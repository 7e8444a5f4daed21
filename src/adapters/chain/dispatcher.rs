//! Signer Dispatcher - TxDispatcher Port over a Wallet Provider
//!
//! Implements the transaction-dispatch port with an alloy wallet
//! provider. The signing key comes from the `DESK_PRIVATE_KEY`
//! environment variable — secrets never live in `config.toml`.
//! Rejections (signer declined, network refused) map to
//! `TransactionRejected` with the transport message preserved.

use std::sync::Arc;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::http::ReqwestTransport;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::ChainConfig;
use crate::domain::error::DeskError;
use crate::ports::dispatch::{TxDispatcher, TxHandle, TxOverrides, TxPayload};

const PRIVATE_KEY_ENV: &str = "DESK_PRIVATE_KEY";

/// Wallet-backed dispatcher for desk transactions.
pub struct SignerDispatcher {
    /// Wallet-filled provider: signs and broadcasts in one call.
    provider: Arc<dyn Provider<ReqwestTransport> + Send + Sync>,
    /// Address of the signing account.
    account: Address,
}

impl SignerDispatcher {
    /// Builds a dispatcher from `DESK_PRIVATE_KEY` and the configured
    /// RPC endpoint.
    #[instrument(skip_all)]
    pub fn connect(config: &ChainConfig) -> Result<Self> {
        let key = std::env::var(PRIVATE_KEY_ENV)
            .with_context(|| format!("{PRIVATE_KEY_ENV} not set"))?;
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .with_context(|| format!("Invalid {PRIVATE_KEY_ENV}"))?;
        let account = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .on_http(config.rpc_url.parse().context("Invalid RPC URL")?);

        info!(%account, "Signer dispatcher ready");

        Ok(Self {
            provider: Arc::new(provider),
            account,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }
}

#[async_trait]
impl TxDispatcher for SignerDispatcher {
    #[instrument(skip(self, payload), fields(to = %payload.to))]
    async fn send_transaction(
        &self,
        payload: &TxPayload,
        overrides: TxOverrides,
    ) -> Result<TxHandle, DeskError> {
        let mut tx = TransactionRequest::default()
            .with_from(self.account)
            .with_to(payload.to)
            .with_input(payload.data.clone())
            .with_value(payload.value);

        if let Some(gas_price) = overrides.gas_price {
            tx = tx.with_gas_price(gas_price);
        }
        if let Some(gas_limit) = overrides.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeskError::TransactionRejected(e.to_string()))?;

        let hash = *pending.tx_hash();
        debug!(tx = %hash, "Transaction accepted by the network");

        Ok(TxHandle { hash })
    }
}
