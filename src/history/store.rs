use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::types::{HistoryEntry, HistoryEntryView, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("history storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history record corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable per-user history store: one JSON document per `user_id` under
/// `data_dir`, mutated by whole-record read-modify-write.
///
/// All operations on one user's record are serialized through a per-user
/// async mutex; operations on distinct users never block each other.
pub struct HistoryStore {
    data_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl HistoryStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Idempotent: creates an empty record (no credential, no history) if the
    /// user has never been seen.
    pub async fn ensure(&self, user_id: &str) -> Result<(), StoreError> {
        let _guard = self.user_lock(user_id).await;
        if tokio::fs::try_exists(self.record_path(user_id)).await? {
            return Ok(());
        }
        debug!(%user_id, "creating user record");
        self.persist(&UserRecord::new(user_id)).await
    }

    /// Appends `entry` at the end of the user's history.
    pub async fn append(&self, user_id: &str, entry: HistoryEntry) -> Result<(), StoreError> {
        let _guard = self.user_lock(user_id).await;
        let mut record = self.load(user_id).await?;
        record.history.push(entry);
        self.persist(&record).await
    }

    /// Overwrites the stored credential digest and appends the issuance
    /// entry under a single lock acquisition, so a concurrent reader can
    /// never observe one without the other.
    pub async fn issue_credential(
        &self,
        user_id: &str,
        api_key_hash: &str,
        entry: HistoryEntry,
    ) -> Result<(), StoreError> {
        let _guard = self.user_lock(user_id).await;
        let mut record = self.load(user_id).await?;
        record.api_key_hash = api_key_hash.to_string();
        record.history.push(entry);
        self.persist(&record).await
    }

    /// Current credential digest; empty string means no credential issued.
    pub async fn api_key_hash(&self, user_id: &str) -> Result<String, StoreError> {
        let _guard = self.user_lock(user_id).await;
        Ok(self.load(user_id).await?.api_key_hash)
    }

    /// Non-deleted entries in insertion order, `deleted` flag stripped.
    pub async fn list_active(&self, user_id: &str) -> Result<Vec<HistoryEntryView>, StoreError> {
        let _guard = self.user_lock(user_id).await;
        let record = self.load(user_id).await?;
        Ok(record
            .history
            .into_iter()
            .filter(|e| !e.deleted)
            .map(HistoryEntryView::from)
            .collect())
    }

    /// First entry matching `timestamp`. A soft-deleted match behaves
    /// exactly like no match at all.
    pub async fn get(&self, user_id: &str, timestamp: i64) -> Result<HistoryEntryView, StoreError> {
        let _guard = self.user_lock(user_id).await;
        let record = self.load(user_id).await?;
        match record.history.into_iter().find(|e| e.timestamp == timestamp) {
            Some(entry) if !entry.deleted => Ok(entry.into()),
            _ => Err(StoreError::NotFound),
        }
    }

    /// Marks the first matching, not-yet-deleted entry as deleted and
    /// persists. Repeat calls for the same timestamp report `NotFound`; the
    /// flag is never toggled back.
    pub async fn soft_delete(&self, user_id: &str, timestamp: i64) -> Result<(), StoreError> {
        let _guard = self.user_lock(user_id).await;
        let mut record = self.load(user_id).await?;
        match record.history.iter_mut().find(|e| e.timestamp == timestamp) {
            Some(entry) if !entry.deleted => {
                entry.deleted = true;
            }
            _ => return Err(StoreError::NotFound),
        }
        self.persist(&record).await
    }

    async fn user_lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(user_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    fn record_path(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(format!("{user_id}.json"))
    }

    async fn load(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        let bytes = match tokio::fs::read(self.record_path(user_id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn persist(&self, record: &UserRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(self.record_path(&record.user_id), bytes).await?;
        Ok(())
    }
}
