use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::SyncRecord;
use crate::store::SyncStore;

/// Stateless save/load over a [`SyncStore`]. Payloads are stored verbatim.
pub struct SyncService {
    store: Arc<dyn SyncStore>,
}

impl SyncService {
    pub fn new(store: Arc<dyn SyncStore>) -> Self {
        Self { store }
    }

    /// Stores `data` and returns the id it was stored under.
    ///
    /// A supplied id that already has a record is overwritten in place. A
    /// missing, blank or unknown id gets a freshly generated v4 UUID.
    pub async fn save(&self, id: Option<String>, data: Option<Value>) -> Result<String, AppError> {
        let data = match data {
            Some(Value::Null) | None => {
                return Err(AppError::BadRequest("data is required".to_string()));
            }
            Some(data) => data,
        };

        let requested = normalize_id(id);
        let known = match &requested {
            Some(id) => self.store.contains(id).await?,
            None => false,
        };

        let id = match requested {
            Some(id) if known => {
                debug!("overwriting record {}", id);
                id
            }
            requested => {
                let id = Uuid::new_v4().to_string();
                if let Some(requested) = requested {
                    debug!("unknown id {}, issuing {}", requested, id);
                }
                id
            }
        };

        let record = SyncRecord::new(data, Utc::now());
        self.store.put(&id, &record).await?;
        info!("saved record {} at {}", id, record.timestamp);

        Ok(id)
    }

    /// Returns the record stored under `id`. Never writes.
    pub async fn load(&self, id: Option<String>) -> Result<SyncRecord, AppError> {
        let id = normalize_id(id).ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;

        let record = self
            .store
            .get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no data found for id {}", id)))?;
        debug!("loaded record {}", id);

        Ok(record)
    }

    pub async fn health(&self) -> Result<(), AppError> {
        self.store.ping().await?;
        Ok(())
    }
}

fn normalize_id(id: Option<String>) -> Option<String> {
    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}
