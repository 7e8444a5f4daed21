//! Cancel Orchestrator - On-chain Order Cancellation
//!
//! Takes an existing history record, builds the cancellation
//! transaction through the execution client, dispatches it, and on
//! acceptance flips the record `Open → Cancelled` with the
//! cancellation hash stamped. The record is otherwise untouched —
//! original amounts and tokens stay for audit.
//!
//! A record with an incomplete on-chain identity (no witness, no
//! payload data) is still attempted with `exists_on_chain = false`
//! passed through to the client; it is never rejected locally.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::domain::error::DeskError;
use crate::domain::order::{OrderRecord, OrderStatus};
use crate::ports::dispatch::{TxDispatcher, TxOverrides};
use crate::ports::execution::ExecutionClient;
use crate::ports::history::{HistoryStore, RecordPatch};
use crate::usecases::flight::SingleFlight;
use crate::usecases::ChainContext;

/// Orchestrates cancellation across the execution, dispatch and
/// history ports.
pub struct CancelOrchestrator<E, D, H> {
    client: Arc<E>,
    dispatcher: Arc<D>,
    history: Arc<H>,
    context: ChainContext,
    /// Fallback gas limit; estimation fails on some handler contracts.
    default_gas_limit: Option<u64>,
    flight: Arc<SingleFlight>,
}

impl<E, D, H> CancelOrchestrator<E, D, H>
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
        default_gas_limit: Option<u64>,
        flight: Arc<SingleFlight>,
    ) -> Self {
        Self {
            client,
            dispatcher,
            history,
            context,
            default_gas_limit,
            flight,
        }
    }

    /// Cancels an order and patches its history record.
    ///
    /// # Errors
    /// `ClientUnreachable`, `MissingContext`, `AlreadyInFlight`,
    /// `TransactionRejected` (message preserved), or `UnknownOrder`
    /// when the record was never appended — a cancellation patch can
    /// never precede its creation.
    #[instrument(skip(self, record, overrides), fields(order_id = %record.id))]
    pub async fn cancel(
        &self,
        record: &OrderRecord,
        overrides: Option<TxOverrides>,
    ) -> Result<OrderRecord, DeskError> {
        if !self.client.is_ready() {
            return Err(DeskError::ClientUnreachable);
        }
        let (_chain_id, _account) = self.context.require()?;

        let _permit = self.flight.acquire()?;

        let exists_on_chain = record.protocol.exists_on_chain();
        if !exists_on_chain {
            debug!("Record identity incomplete; attempting cancellation anyway");
        }

        let payload = self
            .client
            .encode_cancellation(&record.protocol, exists_on_chain)
            .await?;

        let mut overrides = overrides.unwrap_or_default();
        if overrides.gas_limit.is_none() {
            overrides.gas_limit = self.default_gas_limit;
        }

        let handle = self
            .dispatcher
            .send_transaction(&payload, overrides)
            .await?;

        let patched = self
            .history
            .patch(
                &record.id,
                RecordPatch {
                    status: Some(OrderStatus::Cancelled),
                    cancelled_tx_hash: Some(handle.hash_hex()),
                    updated_at: Utc::now(),
                },
            )
            .await?;

        info!(
            order_id = %patched.id,
            tx = %handle.hash_hex(),
            "Order cancellation dispatched"
        );

        Ok(patched)
    }
}
