//! Execution Adapters - Order-Protocol Calldata Encoding
//!
//! Concrete `ExecutionClient` implementation for the execution
//! network's core vault contract.

pub mod encoder;

pub use encoder::{CoreClient, ExecutionAddresses};
