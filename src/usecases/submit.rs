//! Submit Orchestrator - Validated Order Submission
//!
//! Drives one order from a validated draft to a dispatched on-chain
//! submission and an appended history record. The contract:
//!
//! - every precondition failure is a named error with zero side
//!   effects — no dispatch, no history write;
//! - exactly one transaction is dispatched per call;
//! - the record is appended with status `Open` the moment the network
//!   accepts the transaction (optimistic; confirmation is an external
//!   watcher's concern);
//! - a dispatch rejection propagates verbatim and writes nothing, so
//!   history never holds an order without a real transaction hash.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::amount;
use crate::domain::draft::{DerivedAmounts, OrderDraft};
use crate::domain::error::DeskError;
use crate::domain::order::{OrderKind, OrderRecord, OrderStatus};
use crate::domain::validate;
use crate::ports::dispatch::{TxDispatcher, TxOverrides};
use crate::ports::execution::{ExecutionClient, SubmissionRequest};
use crate::ports::history::HistoryStore;
use crate::usecases::flight::SingleFlight;
use crate::usecases::ChainContext;

/// Orchestrates submission across the execution, dispatch and history
/// ports. One instance serves all order kinds.
pub struct SubmitOrchestrator<E, D, H> {
    client: Arc<E>,
    dispatcher: Arc<D>,
    history: Arc<H>,
    context: ChainContext,
    /// Fallback gas price (wei) when the caller supplies none.
    default_gas_price: Option<u128>,
    flight: Arc<SingleFlight>,
}

impl<E, D, H> SubmitOrchestrator<E, D, H>
where
    E: ExecutionClient,
    D: TxDispatcher,
    H: HistoryStore,
{
    pub fn new(
        client: Arc<E>,
        dispatcher: Arc<D>,
        history: Arc<H>,
        context: ChainContext,
        default_gas_price: Option<u128>,
        flight: Arc<SingleFlight>,
    ) -> Self {
        Self {
            client,
            dispatcher,
            history,
            context,
            default_gas_price,
            flight,
        }
    }

    /// Submits a validated draft as an order of the given kind.
    ///
    /// # Errors
    /// `ClientUnreachable`, `MissingContext`, any validator reason,
    /// `AlreadyInFlight`, or `TransactionRejected` with the transport
    /// message preserved. None of these leave a history entry behind.
    #[instrument(skip(self, draft, derived, market_mul_rate, overrides), fields(kind = %kind))]
    pub async fn submit(
        &self,
        kind: OrderKind,
        draft: &OrderDraft,
        derived: &DerivedAmounts,
        market_mul_rate: Option<Decimal>,
        overrides: Option<TxOverrides>,
    ) -> Result<OrderRecord, DeskError> {
        if !self.client.is_ready() {
            return Err(DeskError::ClientUnreachable);
        }
        let (_chain_id, owner) = self.context.require()?;

        if let Some(reason) =
            validate::first_blocking_reason(draft, derived, market_mul_rate)
        {
            warn!(%reason, "Draft rejected by validator");
            return Err(reason.into());
        }

        let _permit = self.flight.acquire()?;

        // Validation guarantees tokens and amounts are present.
        let input_token = draft.input_token.clone().ok_or(DeskError::MissingToken)?;
        let output_token = draft.output_token.clone().ok_or(DeskError::MissingToken)?;
        let input = derived
            .input
            .ok_or_else(|| DeskError::InvalidAmount("input".to_string()))?;
        let output = derived.output.ok_or(DeskError::NoRoute)?;

        // Full-precision fixed-point amounts for the payload.
        let input_fixed = amount::to_fixed_point_u256(
            &input.normalize().to_string(),
            input_token.decimals,
        )?;
        let output_fixed = amount::to_fixed_point_u256(
            &output.normalize().to_string(),
            output_token.decimals,
        )?;

        let min_return = match kind {
            OrderKind::Limit => {
                self.client
                    .fee_adjusted_min_return(output_fixed, draft.slippage_bps)
                    .await?
            }
            // Stop variants carry the raw trigger threshold; the module
            // contract interprets it.
            OrderKind::StopLimit | OrderKind::StopLoss => output_fixed,
        };

        let request = SubmissionRequest {
            kind,
            input_token: input_token.clone(),
            output_token: output_token.clone(),
            input_amount: input_fixed,
            min_return,
            owner,
        };
        let encoded = self.client.encode_submission(&request).await?;

        let mut overrides = overrides.unwrap_or_default();
        if overrides.gas_price.is_none() {
            overrides.gas_price = self.default_gas_price;
        }

        let handle = self
            .dispatcher
            .send_transaction(&encoded.payload, overrides)
            .await?;

        let now = Utc::now();
        let id = encoded
            .order
            .witness
            .map_or_else(|| Uuid::new_v4().to_string(), |w| format!("{w:#x}"));
        let record = OrderRecord {
            id,
            owner,
            input_token,
            output_token,
            input_amount: input_fixed.to_string(),
            min_return: min_return.to_string(),
            kind,
            protocol: encoded.order,
            status: OrderStatus::Open,
            created_tx_hash: handle.hash_hex(),
            cancelled_tx_hash: None,
            created_at: now,
            updated_at: now,
        };

        self.history.append(record.clone()).await?;

        info!(
            order_id = %record.id,
            tx = %record.created_tx_hash,
            input = %record.input_amount,
            min_return = %record.min_return,
            "Order submitted"
        );

        Ok(record)
    }
}
