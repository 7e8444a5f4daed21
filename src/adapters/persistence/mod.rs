//! Persistence Adapters - Order History on Disk
//!
//! File-backed implementation of the `HistoryStore` port. Atomic JSON
//! writes (tmp file, then rename) keep the history crash-safe.

pub mod history;

pub use history::FileHistoryStore;
