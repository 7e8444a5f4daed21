//! History Store Port - Order Record Persistence Interface
//!
//! Append-or-patch persistence for order records keyed by their id
//! (witness or generated key). Records are never deleted; a patch is a
//! single status/hash update that must respect the monotone lifecycle
//! and can only target a record that was already appended — a
//! cancellation can never be recorded before its creation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DeskError;
use crate::domain::order::{OrderRecord, OrderStatus};

/// Fields a patch may set on an existing record.
#[derive(Debug, Clone)]
pub struct RecordPatch {
    /// Status transition to apply, validated against the lifecycle.
    pub status: Option<OrderStatus>,
    /// Lower-cased hash of the cancellation transaction.
    pub cancelled_tx_hash: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Trait for order history persistence providers.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Appends a new record.
    ///
    /// # Errors
    /// `Storage` when a record with the same id already exists or the
    /// backing store fails.
    async fn append(&self, record: OrderRecord) -> Result<(), DeskError>;

    /// Applies a patch to an existing record and returns the result.
    ///
    /// # Errors
    /// `UnknownOrder` when no record with this id was ever appended;
    /// `InvalidTransition` when the status change is not monotone.
    async fn patch(
        &self,
        id: &str,
        patch: RecordPatch,
    ) -> Result<OrderRecord, DeskError>;

    /// Looks up a record by id.
    async fn find(&self, id: &str) -> Result<Option<OrderRecord>, DeskError>;

    /// All records, in stable id order.
    async fn all(&self) -> Result<Vec<OrderRecord>, DeskError>;
}
