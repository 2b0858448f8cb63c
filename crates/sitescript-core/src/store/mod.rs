//! Host-keyed script repository.
//!
//! A [`ScriptStore`] maps a [`HostKey`] to the script body saved for that
//! host. Absence is not an error: `get` on an unknown host yields an empty
//! record. Entries are only ever created or overwritten; nothing here deletes.
//!
//! Backends:
//! - [`MemoryStore`]: process-local map, used in tests and embedding.
//! - [`JsonFileStore`]: one JSON document under the XDG state dir.
//! - [`SqliteStore`]: SQLite database via sqlx.

mod error;
mod json_file;
mod memory;
mod record;
mod sqlite;

use std::future::Future;
use std::path::PathBuf;

use crate::config::{SiteScriptConfig, StoreBackend};
use crate::host_key::HostKey;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::ScriptRecord;
pub use sqlite::SqliteStore;

/// Key-value persistence for per-host scripts.
///
/// Implementations must make `put` atomic from the caller's perspective and
/// durable once the returned future resolves (for persistent backends).
pub trait ScriptStore: Send + Sync {
    /// Stored record for `key`, or the empty record if none exists.
    fn get(&self, key: &HostKey) -> impl Future<Output = Result<ScriptRecord, StoreError>> + Send;

    /// Insert or overwrite the record for `key`.
    fn put(
        &self,
        key: &HostKey,
        record: ScriptRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All hosts with a stored record, sorted.
    fn hosts(&self) -> impl Future<Output = Result<Vec<HostKey>, StoreError>> + Send;

    /// Every stored record with its host, sorted by host, in one read.
    fn entries(
        &self,
    ) -> impl Future<Output = Result<Vec<(HostKey, ScriptRecord)>, StoreError>> + Send;
}

/// The store selected by configuration.
#[derive(Debug)]
pub enum ConfiguredStore {
    Json(JsonFileStore),
    Sqlite(SqliteStore),
}

impl ConfiguredStore {
    /// Open the backend named in `cfg`, honouring its `state_dir` override.
    pub async fn open(cfg: &SiteScriptConfig) -> Result<Self, StoreError> {
        let store = match (cfg.store, cfg.state_dir.as_ref()) {
            (StoreBackend::Json, Some(dir)) => {
                Self::Json(JsonFileStore::at(dir.join(JsonFileStore::FILE_NAME)))
            }
            (StoreBackend::Json, None) => Self::Json(JsonFileStore::open_default()?),
            (StoreBackend::Sqlite, Some(dir)) => {
                Self::Sqlite(SqliteStore::open_at(dir.join(SqliteStore::FILE_NAME)).await?)
            }
            (StoreBackend::Sqlite, None) => Self::Sqlite(SqliteStore::open_default().await?),
        };
        tracing::debug!(location = %store.location().display(), "opened script store");
        Ok(store)
    }

    /// File backing the store.
    pub fn location(&self) -> PathBuf {
        match self {
            Self::Json(s) => s.path().to_path_buf(),
            Self::Sqlite(s) => s.path().to_path_buf(),
        }
    }
}

impl ScriptStore for ConfiguredStore {
    async fn get(&self, key: &HostKey) -> Result<ScriptRecord, StoreError> {
        match self {
            Self::Json(s) => s.get(key).await,
            Self::Sqlite(s) => s.get(key).await,
        }
    }

    async fn put(&self, key: &HostKey, record: ScriptRecord) -> Result<(), StoreError> {
        match self {
            Self::Json(s) => s.put(key, record).await,
            Self::Sqlite(s) => s.put(key, record).await,
        }
    }

    async fn hosts(&self) -> Result<Vec<HostKey>, StoreError> {
        match self {
            Self::Json(s) => s.hosts().await,
            Self::Sqlite(s) => s.hosts().await,
        }
    }

    async fn entries(&self) -> Result<Vec<(HostKey, ScriptRecord)>, StoreError> {
        match self {
            Self::Json(s) => s.entries().await,
            Self::Sqlite(s) => s.entries().await,
        }
    }
}
