//! SQLite-backed script store (sqlx).
//!
//! One row per host; `put` is a single upsert statement so a write is never
//! observable as partially applied.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};

use super::{ScriptRecord, ScriptStore, StoreError};
use crate::host_key::HostKey;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite script database.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/sitescript/scripts.db` on Debian.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    path: PathBuf,
}

impl SqliteStore {
    pub const FILE_NAME: &'static str = "scripts.db";

    /// Open (or create) the default database and run migrations.
    pub async fn open_default() -> Result<Self, StoreError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sitescript")?;
        let db_path = xdg_dirs
            .get_state_home()
            .join("sitescript")
            .join(Self::FILE_NAME);
        Self::open_at(db_path).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let store = SqliteStore {
            pool,
            path: path.to_path_buf(),
        };
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory database (no disk I/O). Everything is lost on drop.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        // Each connection to `sqlite::memory:` is its own database, so keep
        // exactly one and never let the pool recycle it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = SqliteStore {
            pool,
            path: PathBuf::from(":memory:"),
        };
        store.migrate().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scripts (
                host TEXT PRIMARY KEY NOT NULL,
                script TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl ScriptStore for SqliteStore {
    async fn get(&self, key: &HostKey) -> Result<ScriptRecord, StoreError> {
        let row = sqlx::query("SELECT script FROM scripts WHERE host = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(ScriptRecord::from(row.try_get::<String, _>("script")?)),
            None => Ok(ScriptRecord::empty()),
        }
    }

    async fn put(&self, key: &HostKey, record: ScriptRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO scripts (host, script, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(host) DO UPDATE SET
                script = excluded.script,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(record.as_str())
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?;
        tracing::debug!(host = %key, "saved script");
        Ok(())
    }

    async fn hosts(&self) -> Result<Vec<HostKey>, StoreError> {
        let rows = sqlx::query("SELECT host FROM scripts ORDER BY host")
            .fetch_all(&self.pool)
            .await?;
        let mut hosts = Vec::with_capacity(rows.len());
        for row in rows {
            let host: String = row.try_get("host")?;
            if let Some(key) = HostKey::from_string_key(&host) {
                hosts.push(key);
            }
        }
        Ok(hosts)
    }

    async fn entries(&self) -> Result<Vec<(HostKey, ScriptRecord)>, StoreError> {
        let rows = sqlx::query("SELECT host, script FROM scripts ORDER BY host")
            .fetch_all(&self.pool)
            .await?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let host: String = row.try_get("host")?;
            let script: String = row.try_get("script")?;
            if let Some(key) = HostKey::from_string_key(&host) {
                entries.push((key, ScriptRecord::from(script)));
            }
        }
        Ok(entries)
    }
}

/// Current time as Unix seconds (for row timestamps).
fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
