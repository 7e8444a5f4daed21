//! Core Contract Client - Order Submission and Cancellation Calldata
//!
//! Implements the `ExecutionClient` port against the order-execution
//! network's core vault contract. Each order kind maps to a module
//! contract; execution routes through a DEX-specific handler. All
//! addresses come from `config.toml` — nothing is hardcoded.
//!
//! Submissions are bound to a freshly generated secret key: the
//! witness address (its public counterpart) is committed on-chain and
//! the executor proves knowledge of the secret at fill time. Native
//! input tokens travel as call value instead of ERC-20 calldata.

use alloy::primitives::{Address, Bytes, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::ExecutionConfig;
use crate::domain::error::DeskError;
use crate::domain::order::{OrderKind, ProtocolOrder};
use crate::ports::dispatch::TxPayload;
use crate::ports::execution::{
    EncodedSubmission, ExecutionClient, SubmissionRequest,
};

sol! {
    /// Core vault entrypoints shared by every order module.
    function createOrder(
        address module,
        address inputToken,
        address owner,
        address witness,
        uint256 amount,
        bytes data
    ) payable;

    function cancelOrder(
        address module,
        address inputToken,
        address owner,
        address witness,
        bytes data
    );
}

const BPS_DENOMINATOR: u64 = 10_000;

/// Contract addresses for the execution network, parsed from config.
#[derive(Debug, Clone)]
pub struct ExecutionAddresses {
    /// Core vault contract all transactions target.
    pub core: Address,
    pub limit_module: Address,
    pub stop_limit_module: Address,
    pub stop_loss_module: Address,
    /// DEX-specific handler the modules route through, when one is
    /// deployed for this chain.
    pub handler: Option<Address>,
}

/// `ExecutionClient` implementation for the core vault contract.
pub struct CoreClient {
    addresses: ExecutionAddresses,
    chain_id: u64,
    /// Protocol fee in basis points; `None` on chains where the
    /// execution layer charges none.
    protocol_fee_bps: Option<u32>,
}

impl CoreClient {
    /// Parses config addresses and builds the client.
    pub fn new(config: &ExecutionConfig, chain_id: u64) -> Result<Self> {
        let parse = |name: &str, value: &str| -> Result<Address> {
            value
                .parse()
                .with_context(|| format!("Invalid {name} address: {value}"))
        };

        let addresses = ExecutionAddresses {
            core: parse("core", &config.core)?,
            limit_module: parse("limit_module", &config.limit_module)?,
            stop_limit_module: parse("stop_limit_module", &config.stop_limit_module)?,
            stop_loss_module: parse("stop_loss_module", &config.stop_loss_module)?,
            handler: config
                .handler
                .as_deref()
                .map(|h| parse("handler", h))
                .transpose()?,
        };

        Ok(Self {
            addresses,
            chain_id,
            protocol_fee_bps: config.protocol_fee_bps,
        })
    }

    fn module_for(&self, kind: OrderKind) -> Address {
        match kind {
            OrderKind::Limit => self.addresses.limit_module,
            OrderKind::StopLimit => self.addresses.stop_limit_module,
            OrderKind::StopLoss => self.addresses.stop_loss_module,
        }
    }
}

#[async_trait]
impl ExecutionClient for CoreClient {
    fn is_ready(&self) -> bool {
        self.chain_id != 0 && !self.addresses.core.is_zero()
    }

    async fn fee_adjusted_min_return(
        &self,
        output_amount: U256,
        slippage_bps: u32,
    ) -> Result<U256, DeskError> {
        let Some(fee_bps) = self.protocol_fee_bps else {
            // No protocol fee on this chain; the raw output stands.
            return Ok(output_amount);
        };

        let bps = U256::from(BPS_DENOMINATOR);
        let after_fee = output_amount * (bps - U256::from(fee_bps)) / bps;
        let after_slippage = after_fee * (bps - U256::from(slippage_bps)) / bps;
        Ok(after_slippage)
    }

    #[instrument(skip(self, request), fields(kind = %request.kind))]
    async fn encode_submission(
        &self,
        request: &SubmissionRequest,
    ) -> Result<EncodedSubmission, DeskError> {
        let module = self.module_for(request.kind);
        let handler = self.addresses.handler;

        // Fresh secret per order; the witness address proves knowledge
        // of it at execution time.
        let secret_key = PrivateKeySigner::random();
        let witness = secret_key.address();
        let secret = hex::encode(secret_key.to_bytes());

        let data: Bytes = match handler {
            Some(h) => (h, request.output_token.address, request.min_return)
                .abi_encode()
                .into(),
            None => (request.output_token.address, request.min_return)
                .abi_encode()
                .into(),
        };

        let call = createOrderCall {
            module,
            inputToken: request.input_token.address,
            owner: request.owner,
            witness,
            amount: request.input_amount,
            data: data.clone(),
        };

        let value = if request.input_token.is_native {
            request.input_amount
        } else {
            U256::ZERO
        };

        let order = ProtocolOrder {
            module: Some(module),
            handler,
            input_token: Some(request.input_token.address),
            output_token: Some(request.output_token.address),
            owner: Some(request.owner),
            witness: Some(witness),
            data: Some(format!("0x{}", hex::encode(&data))),
            secret: Some(secret),
        };

        debug!(%witness, module = %module, "Submission encoded");

        Ok(EncodedSubmission {
            order,
            payload: TxPayload {
                to: self.addresses.core,
                data: call.abi_encode().into(),
                value,
            },
        })
    }

    #[instrument(skip(self, order))]
    async fn encode_cancellation(
        &self,
        order: &ProtocolOrder,
        exists_on_chain: bool,
    ) -> Result<TxPayload, DeskError> {
        if !exists_on_chain {
            // Caller could not vouch for the full identity; unknown
            // fields encode as zero values and the chain arbitrates.
            debug!("Encoding cancellation for partially-known order");
        }

        let data: Bytes = match &order.data {
            Some(hex_data) => hex_data
                .parse()
                .map_err(|_| {
                    DeskError::Storage(format!("malformed order data: {hex_data}"))
                })?,
            None => Bytes::new(),
        };

        let call = cancelOrderCall {
            module: order.module.unwrap_or(Address::ZERO),
            inputToken: order.input_token.unwrap_or(Address::ZERO),
            owner: order.owner.unwrap_or(Address::ZERO),
            witness: order.witness.unwrap_or(Address::ZERO),
            data,
        };

        Ok(TxPayload {
            to: self.addresses.core,
            data: call.abi_encode().into(),
            value: U256::ZERO,
        })
    }
}
