//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! desk's core workflows. Each use case is a self-contained business
//! operation.
//!
//! Use cases:
//! - `OrderEntrySession`: draft mutation + memoized derivation
//! - `SubmitOrchestrator`: validated submission dispatch + history append
//! - `CancelOrchestrator`: cancellation dispatch + history patch
//! - `SingleFlight`: double-submission guard shared by both

pub mod cancel;
pub mod flight;
pub mod session;
pub mod submit;

use alloy::primitives::Address;

use crate::domain::error::DeskError;

/// Session context required before any transaction can be built.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainContext {
    pub chain_id: Option<u64>,
    pub account: Option<Address>,
}

impl ChainContext {
    pub fn new(chain_id: u64, account: Address) -> Self {
        Self {
            chain_id: Some(chain_id),
            account: Some(account),
        }
    }

    /// Both pieces of context, or the name of the missing one.
    pub fn require(&self) -> Result<(u64, Address), DeskError> {
        let chain_id = self
            .chain_id
            .ok_or(DeskError::MissingContext("chain id"))?;
        let account = self
            .account
            .ok_or(DeskError::MissingContext("account"))?;
        Ok((chain_id, account))
    }
}
