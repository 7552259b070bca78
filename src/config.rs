use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::db;
use crate::error::{ConfigError, StoreError};
use crate::store::{MemorySyncStore, SqliteSyncStore, SyncStore};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://timetable.db";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = ".timetable";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite(String),
    Memory,
}

impl StoreBackend {
    /// `memory` selects the in-process map, anything else is a sqlite url.
    pub fn from_url(url: &str) -> Self {
        if url.trim().eq_ignore_ascii_case("memory") {
            StoreBackend::Memory
        } else {
            StoreBackend::Sqlite(url.trim().to_string())
        }
    }

    pub async fn open(&self) -> Result<Arc<dyn SyncStore>, StoreError> {
        match self {
            StoreBackend::Sqlite(url) => {
                let pool = db::connect(url).await?;
                Ok(Arc::new(SqliteSyncStore::new(pool)))
            }
            StoreBackend::Memory => Ok(Arc::new(MemorySyncStore::new())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
}

impl ServerConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let bind = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key: "BIND_ADDR", value: bind.clone() })?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            bind_addr,
            backend: StoreBackend::from_url(&database_url),
        })
    }
}

/// Client settings. The CLI fills these from flags or `SYNC_API_URL` and
/// `TIMETABLE_DATA_DIR`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub data_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_is_selected_by_keyword() {
        assert_eq!(StoreBackend::from_url("memory"), StoreBackend::Memory);
        assert_eq!(StoreBackend::from_url(" MEMORY "), StoreBackend::Memory);
        assert_eq!(
            StoreBackend::from_url("sqlite://data.db"),
            StoreBackend::Sqlite("sqlite://data.db".to_string())
        );
    }
}
