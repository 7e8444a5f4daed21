//! Adapters Layer - Concrete Port Implementations
//!
//! Everything that touches the outside world lives here:
//! - `chain`: alloy RPC provider + wallet-backed transaction dispatch
//! - `execution`: order-protocol calldata encoding
//! - `persistence`: file-backed order history

pub mod chain;
pub mod execution;
pub mod persistence;
