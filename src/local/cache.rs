//! Device cache for the timetable and sync id.
//!
//! Reads fall back to defaults and writes only log on failure: the in-memory
//! session stays authoritative until the next start.

use tracing::{debug, warn};

use super::{DeviceStorage, SYNC_ID_KEY, TIMETABLE_KEY, transfer};
use crate::error::LocalError;
use crate::models::Timetable;

/// Cached timetable, or a fresh one when nothing usable is stored.
pub fn load_timetable(storage: &dyn DeviceStorage) -> Timetable {
    let raw = match storage.get(TIMETABLE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Timetable::new_initial(),
        Err(e) => {
            warn!("failed to read cached timetable: {}", e);
            return Timetable::new_initial();
        }
    };

    match transfer::import_from_str(&raw) {
        Ok(timetable) => timetable,
        Err(e) => {
            warn!("cached timetable is corrupt, starting empty: {}", e);
            Timetable::new_initial()
        }
    }
}

pub fn save_timetable(storage: &dyn DeviceStorage, timetable: &Timetable) {
    let result = serde_json::to_string(timetable)
        .map_err(LocalError::from)
        .and_then(|raw| storage.set(TIMETABLE_KEY, &raw));

    match result {
        Ok(()) => debug!("cached timetable"),
        Err(e) => warn!("failed to cache timetable: {}", e),
    }
}

pub fn load_sync_id(storage: &dyn DeviceStorage) -> Option<String> {
    match storage.get(SYNC_ID_KEY) {
        Ok(id) => id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()),
        Err(e) => {
            warn!("failed to read sync id: {}", e);
            None
        }
    }
}

pub fn save_sync_id(storage: &dyn DeviceStorage, id: &str) {
    if let Err(e) = storage.set(SYNC_ID_KEY, id) {
        warn!("failed to store sync id: {}", e);
    }
}
