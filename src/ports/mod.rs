//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ExecutionClient`: order-protocol payload encoding
//! - `TxDispatcher`: signed transaction submission
//! - `HistoryStore`: order record persistence
//! - `PriceSource`: market reference rates

pub mod dispatch;
pub mod execution;
pub mod history;
pub mod price_feed;
