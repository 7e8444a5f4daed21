//! Token references used across the desk.
//!
//! A `Token` is an opaque, immutable reference to an on-chain asset:
//! address, decimal precision, display symbol and a native/wrapped flag.
//! Identity is keyed by address — two tokens with the same address are
//! the same asset regardless of metadata.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// An on-chain token selected into an order draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address (zero address for the chain-native coin).
    pub address: Address,
    /// Decimal precision used for fixed-point scaling.
    pub decimals: u8,
    /// Display symbol.
    pub symbol: String,
    /// Whether this is the chain-native coin rather than an ERC-20.
    pub is_native: bool,
}

impl Token {
    /// Creates an ERC-20 token reference.
    pub fn new(address: Address, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            address,
            decimals,
            symbol: symbol.into(),
            is_native: false,
        }
    }

    /// Creates a reference to the chain-native coin (zero address).
    pub fn native(decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            address: Address::ZERO,
            decimals,
            symbol: symbol.into(),
            is_native: true,
        }
    }

    /// Two tokens are the same asset when their addresses match.
    pub fn same_asset(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
