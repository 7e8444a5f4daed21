//! Transaction Dispatch Port - Signed Transaction Submission
//!
//! The desk never talks to a wallet or RPC node directly; it hands a
//! prepared payload to this port and observes either an accepted
//! transaction handle or a rejection. No retries, no timeouts at this
//! layer — transport policy belongs to the adapter.

use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use crate::domain::error::DeskError;

/// A prepared transaction: target contract, calldata and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPayload {
    pub to: Address,
    pub data: Bytes,
    /// Native value carried with the call (native-token submissions).
    pub value: U256,
}

/// Caller-supplied transaction overrides. Unset fields fall back to
/// the orchestrator defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOverrides {
    /// Gas price in wei.
    pub gas_price: Option<u128>,
    /// Gas limit; used to sidestep estimation failures.
    pub gas_limit: Option<u64>,
}

/// Handle to a dispatched (accepted, not yet confirmed) transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: B256,
}

impl TxHandle {
    /// Lower-cased 0x-prefixed hash, the form history records store.
    pub fn hash_hex(&self) -> String {
        format!("{:#x}", self.hash)
    }
}

/// Trait for transaction dispatch providers.
#[async_trait]
pub trait TxDispatcher: Send + Sync + 'static {
    /// Signs and broadcasts one transaction.
    ///
    /// # Errors
    /// `TransactionRejected` with the transport message preserved when
    /// the signer declines or the network refuses the transaction.
    async fn send_transaction(
        &self,
        payload: &TxPayload,
        overrides: TxOverrides,
    ) -> Result<TxHandle, DeskError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn test_hash_hex_is_lowercase() {
        let handle = TxHandle {
            hash: b256!("00000000000000000000000000000000000000000000000000000000DEADBEEF"),
        };
        let hex = handle.hash_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex, hex.to_lowercase());
        assert!(hex.ends_with("deadbeef"));
    }
}
