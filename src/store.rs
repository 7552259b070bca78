use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::db::repository;
use crate::error::StoreError;
use crate::models::SyncRecord;

/// Key-value backend holding one [`SyncRecord`] per sync id.
/// `put` is a full replacement, concurrent writers resolve last-write-wins.
#[async_trait]
pub trait SyncStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<SyncRecord>, StoreError>;
    async fn put(&self, id: &str, record: &SyncRecord) -> Result<(), StoreError>;
    async fn contains(&self, id: &str) -> Result<bool, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

pub struct SqliteSyncStore {
    db: SqlitePool,
}

impl SqliteSyncStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncStore for SqliteSyncStore {
    async fn get(&self, id: &str) -> Result<Option<SyncRecord>, StoreError> {
        let Some(row) = repository::fetch_record(&self.db, id).await? else {
            return Ok(None);
        };

        Ok(Some(SyncRecord {
            data: serde_json::from_str(&row.payload)?,
            timestamp: row.timestamp,
        }))
    }

    async fn put(&self, id: &str, record: &SyncRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&record.data)?;
        repository::upsert_record(&self.db, id, &payload, &record.timestamp).await?;
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(repository::record_exists(&self.db, id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(repository::ping(&self.db).await?)
    }
}

#[derive(Default)]
pub struct MemorySyncStore {
    records: RwLock<HashMap<String, SyncRecord>>,
}

impl MemorySyncStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncStore for MemorySyncStore {
    async fn get(&self, id: &str) -> Result<Option<SyncRecord>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, record: &SyncRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
