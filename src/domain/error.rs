//! Desk error taxonomy.
//!
//! One enum covers the whole surface: draft validation, orchestration
//! preconditions, transaction dispatch and history-store contract
//! violations. Orchestrators return these verbatim so callers see the
//! original failure message, never a swallowed or rewrapped one.

use thiserror::Error;

use crate::domain::order::OrderStatus;

/// Errors raised by the order desk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    /// Execution client is not constructed for this chain/signer.
    #[error("execution client unreachable: no client for this chain")]
    ClientUnreachable,

    /// A required piece of session context (chain id, account) is absent.
    #[error("missing context: {0}")]
    MissingContext(&'static str),

    /// Typed or derived amount is not a usable non-negative decimal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Input and output token refer to the same asset.
    #[error("order not allowed between identical tokens")]
    IdenticalTokens,

    /// One or both sides of the pair have no token selected.
    #[error("no token selected")]
    MissingToken,

    /// Dependent amounts cannot be derived (no market rate available).
    #[error("no derivable rate for this pair")]
    NoRoute,

    /// Requested execution price is worse than the current market rate.
    #[error("order price is below the current market rate")]
    PriceBelowMarket,

    #[error("division by zero")]
    DivisionByZero,

    /// Signer or network declined the transaction. Message preserved.
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// Another submission or cancellation is still in flight.
    #[error("a submission or cancellation is already in flight")]
    AlreadyInFlight,

    /// History patch targeted an id that was never appended.
    #[error("unknown order: {0}")]
    UnknownOrder(String),

    /// Attempted a non-monotone order status transition.
    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// History store I/O or serialization failure.
    #[error("history store failure: {0}")]
    Storage(String),
}
