//! Order records and their lifecycle.
//!
//! A record is created the moment a submission transaction is accepted
//! by the network (optimistic, not on confirmation) and is never
//! deleted afterwards — only its status flips, monotonically:
//!
//! ```text
//! Open ──┬─> Submitted ──┬─> Cancelled
//!        │               └─> Executed
//!        ├─> Cancelled
//!        └─> Executed
//! ```
//!
//! `Submitted` is an optional intermediate applied by an external
//! confirmation watcher; nothing ever returns to `Open`.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DeskError;
use crate::domain::token::Token;

/// Which conditional-order variant a record represents.
///
/// Variants differ only in the on-chain module that executes them and
/// in how the minimum return is derived at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    StopLimit,
    StopLoss,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::StopLimit => write!(f, "stop-limit"),
            Self::StopLoss => write!(f, "stop-loss"),
        }
    }
}

/// Lifecycle status of an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Submission dispatched and accepted by the network.
    Open,
    /// Observed included on-chain by an external watcher.
    Submitted,
    /// Cancellation dispatched.
    Cancelled,
    /// Filled by the execution network.
    Executed,
}

impl OrderStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Submitted | Self::Cancelled | Self::Executed)
                | (Self::Submitted, Self::Cancelled | Self::Executed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Executed)
    }
}

/// On-chain identity of an order as the execution network sees it.
///
/// Every field is optional: records imported from elsewhere may be
/// partially known. [`Self::exists_on_chain`] tells the execution
/// client whether an existence check would be redundant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolOrder {
    /// Module contract responsible for this order kind.
    pub module: Option<Address>,
    /// DEX-specific handler the module routes execution through.
    pub handler: Option<Address>,
    pub input_token: Option<Address>,
    pub output_token: Option<Address>,
    pub owner: Option<Address>,
    /// Witness address derived from the per-order secret.
    pub witness: Option<Address>,
    /// ABI-encoded order data payload, 0x-prefixed hex.
    pub data: Option<String>,
    /// Hex-encoded secret key backing the witness.
    pub secret: Option<String>,
}

impl ProtocolOrder {
    /// True when the record carries the full on-chain identity:
    /// module, input token, owner, witness and data payload.
    pub fn exists_on_chain(&self) -> bool {
        self.module.is_some()
            && self.input_token.is_some()
            && self.owner.is_some()
            && self.witness.is_some()
            && self.data.is_some()
    }
}

/// A persisted order history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Witness hex, or a generated key when no witness exists.
    pub id: String,
    pub owner: Address,
    pub input_token: Token,
    pub output_token: Token,
    /// Fixed-point input amount (integer string).
    pub input_amount: String,
    /// Fixed-point minimum (or, for stop-loss, maximum) return.
    pub min_return: String,
    pub kind: OrderKind,
    pub protocol: ProtocolOrder,
    pub status: OrderStatus,
    /// Lower-cased hash of the dispatched submission transaction.
    pub created_tx_hash: String,
    pub cancelled_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Applies a status transition, enforcing lifecycle monotonicity.
    pub fn transition(
        &mut self,
        next: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(), DeskError> {
        if !self.status.can_transition_to(next) {
            return Err(DeskError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}
