//! Execution Client Port - Order-Protocol Encoding Interface
//!
//! Defines the trait for the on-chain order-execution network client:
//! encoding submission payloads (witness-bound for stop variants),
//! fee/slippage-adjusted minimum returns, and cancellation calldata.
//!
//! All amounts crossing this boundary are fixed-point `U256` values
//! scaled by the respective token's decimal count. The client encodes;
//! dispatching is the [`super::dispatch`] port's job.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::domain::error::DeskError;
use crate::domain::order::{OrderKind, ProtocolOrder};
use crate::domain::token::Token;
use crate::ports::dispatch::TxPayload;

/// A validated order ready to be encoded for submission.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub kind: OrderKind,
    pub input_token: Token,
    pub output_token: Token,
    /// Fixed-point input amount.
    pub input_amount: U256,
    /// Fixed-point minimum (stop-loss: maximum) return, already
    /// fee/slippage-adjusted where applicable.
    pub min_return: U256,
    pub owner: Address,
}

/// Result of encoding a submission: the transaction payload plus the
/// full on-chain identity to persist with the history record.
#[derive(Debug, Clone)]
pub struct EncodedSubmission {
    pub order: ProtocolOrder,
    pub payload: TxPayload,
}

/// Trait for order-execution network clients.
#[async_trait]
pub trait ExecutionClient: Send + Sync + 'static {
    /// Whether the client is constructed for a usable chain context.
    fn is_ready(&self) -> bool;

    /// Adjusts a raw output amount for the protocol fee and slippage
    /// tolerance. Identity on chains where the execution layer charges
    /// no fee.
    async fn fee_adjusted_min_return(
        &self,
        output_amount: U256,
        slippage_bps: u32,
    ) -> Result<U256, DeskError>;

    /// Encodes a submission payload. The order is bound to a freshly
    /// generated secret; its witness address travels in the returned
    /// [`ProtocolOrder`].
    async fn encode_submission(
        &self,
        request: &SubmissionRequest,
    ) -> Result<EncodedSubmission, DeskError>;

    /// Builds a cancellation transaction for an order.
    ///
    /// `exists_on_chain` tells the client the caller already supplied
    /// the full on-chain identity, so an existence check would be
    /// redundant. A partially-known order must still be encoded and
    /// attempted, never rejected locally.
    async fn encode_cancellation(
        &self,
        order: &ProtocolOrder,
        exists_on_chain: bool,
    ) -> Result<TxPayload, DeskError>;
}
