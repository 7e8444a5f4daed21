//! File History Store - Atomic JSON Order Record Persistence
//!
//! Implements the `HistoryStore` port over a single `orders.json`
//! file. Records live in an in-memory map guarded by a mutex; every
//! mutation is flushed with an atomic write (tmp file, then rename) so
//! the file is always either the old or the new version, never a
//! partial write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::error::DeskError;
use crate::domain::order::{OrderRecord, OrderStatus};
use crate::ports::history::{HistoryStore, RecordPatch};

/// Atomic JSON-backed order history.
pub struct FileHistoryStore {
    /// Path to orders.json.
    orders_path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    /// Records keyed by order id; BTreeMap keeps file output stable.
    records: Mutex<BTreeMap<String, OrderRecord>>,
}

impl FileHistoryStore {
    /// Opens (or initializes) the history in the given data directory.
    #[instrument(skip_all)]
    pub async fn open(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)
            .await
            .context("Failed to create data directory")?;

        let orders_path = dir.join("orders.json");
        let tmp_path = dir.join("orders.json.tmp");

        let records = if orders_path.exists() {
            let json = fs::read_to_string(&orders_path)
                .await
                .context("Failed to read order history")?;
            let list: Vec<OrderRecord> =
                serde_json::from_str(&json).context("Failed to parse order history")?;
            let mut map = BTreeMap::new();
            for record in list {
                if map.insert(record.id.clone(), record).is_some() {
                    warn!("Duplicate order id in history file, keeping last");
                }
            }
            map
        } else {
            info!("No order history found, starting fresh");
            BTreeMap::new()
        };

        info!(
            path = %orders_path.display(),
            count = records.len(),
            "Order history loaded"
        );

        Ok(Self {
            orders_path,
            tmp_path,
            records: Mutex::new(records),
        })
    }

    /// Records that are still open, for startup reporting.
    pub async fn open_orders(&self) -> Vec<OrderRecord> {
        self.records
            .lock()
            .await
            .values()
            .filter(|r| r.status == OrderStatus::Open)
            .cloned()
            .collect()
    }

    /// Serialize the map and atomically replace orders.json.
    async fn flush(&self, records: &BTreeMap<String, OrderRecord>) -> Result<(), DeskError> {
        let list: Vec<&OrderRecord> = records.values().collect();
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| DeskError::Storage(e.to_string()))?;

        fs::write(&self.tmp_path, &json)
            .await
            .map_err(|e| DeskError::Storage(e.to_string()))?;
        fs::rename(&self.tmp_path, &self.orders_path)
            .await
            .map_err(|e| DeskError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    #[instrument(skip(self, record), fields(order_id = %record.id))]
    async fn append(&self, record: OrderRecord) -> Result<(), DeskError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.id) {
            return Err(DeskError::Storage(format!(
                "duplicate order id: {}",
                record.id
            )));
        }
        records.insert(record.id.clone(), record);
        self.flush(&records).await
    }

    #[instrument(skip(self, patch), fields(order_id = %id))]
    async fn patch(
        &self,
        id: &str,
        patch: RecordPatch,
    ) -> Result<OrderRecord, DeskError> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| DeskError::UnknownOrder(id.to_string()))?;

        if let Some(status) = patch.status {
            record.transition(status, patch.updated_at)?;
        } else {
            record.updated_at = patch.updated_at;
        }
        if let Some(hash) = patch.cancelled_tx_hash {
            record.cancelled_tx_hash = Some(hash);
        }

        let patched = record.clone();
        self.flush(&records).await?;
        Ok(patched)
    }

    async fn find(&self, id: &str) -> Result<Option<OrderRecord>, DeskError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<OrderRecord>, DeskError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}
