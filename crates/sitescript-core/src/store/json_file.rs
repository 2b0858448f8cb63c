//! Persist scripts as one JSON document under the XDG state dir.
//!
//! Layout: `{ "version": 1, "scripts": { "<host>": "<script>" } }`.
//!
//! Every `put` is a read-modify-write of the whole document, done while
//! holding an exclusive lock on a sibling `.<name>.lock` file. The lock is
//! taken per write, not per handle, so separate handles and separate
//! processes never drop each other's hosts. The new document goes to a unique
//! temp file in the same directory and is renamed over the target, so readers
//! (which take no lock) never observe a half-written file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{ScriptRecord, ScriptStore, StoreError};
use crate::host_key::HostKey;

const CURRENT_VERSION: u32 = 1;

/// Serializable form of the whole repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScriptFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

impl Default for ScriptFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            scripts: BTreeMap::new(),
        }
    }
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn parse(path: &Path, bytes: &[u8]) -> Result<ScriptFile, StoreError> {
    let file: ScriptFile = serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if file.version != CURRENT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
        });
    }
    Ok(file)
}

/// Exclusive advisory lock on the store's lock file. Unlocks on drop.
struct WriteLock<'a> {
    file: &'a File,
}

impl<'a> WriteLock<'a> {
    fn acquire(file: &'a File) -> std::io::Result<Self> {
        // Call the fs4 trait explicitly; newer std has an inherent `File::lock_exclusive`.
        FileExt::lock_exclusive(file)?;
        Ok(Self { file })
    }
}

impl Drop for WriteLock<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.file);
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "scripts.json";

    /// Default path: `~/.local/state/sitescript/scripts.json`.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sitescript")?;
        Ok(xdg_dirs
            .get_state_home()
            .join("sitescript")
            .join(Self::FILE_NAME))
    }

    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::at(Self::default_path()?))
    }

    /// Store backed by `path`. The file, its lock file, and the parent
    /// directory are created on first write.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| Self::FILE_NAME.to_string());
        self.path.with_file_name(format!(".{name}.lock"))
    }

    async fn load(&self) -> Result<ScriptFile, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => parse(&self.path, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ScriptFile::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Locked read-modify-write. Blocking; runs on tokio's blocking pool.
    fn upsert_blocking(&self, host: &str, source: String) -> Result<(), StoreError> {
        let dir = self.dir();
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(io_err(&lock_path))?;
        let _lock = WriteLock::acquire(&lock_file).map_err(io_err(&lock_path))?;

        let mut file = match fs::read(&self.path) {
            Ok(bytes) => parse(&self.path, &bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => ScriptFile::default(),
            Err(e) => return Err(io_err(&self.path)(e)),
        };
        file.scripts.insert(host.to_string(), source);
        let json = serde_json::to_vec_pretty(&file).map_err(StoreError::Serialize)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(&json).map_err(io_err(&tmp_path))?;
        tmp.as_file().sync_all().map_err(io_err(&tmp_path))?;
        tmp.persist(&self.path)
            .map_err(|e| io_err(&self.path)(e.error))?;
        Ok(())
    }
}

impl ScriptStore for JsonFileStore {
    async fn get(&self, key: &HostKey) -> Result<ScriptRecord, StoreError> {
        let file = self.load().await?;
        Ok(file
            .scripts
            .get(key.as_str())
            .map(|s| ScriptRecord::new(s.as_str()))
            .unwrap_or_default())
    }

    async fn put(&self, key: &HostKey, record: ScriptRecord) -> Result<(), StoreError> {
        let store = self.clone();
        let host = key.as_str().to_string();
        let source = record.into_source();
        tokio::task::spawn_blocking(move || store.upsert_blocking(&host, source)).await??;
        tracing::debug!(host = %key, path = %self.path.display(), "saved script");
        Ok(())
    }

    async fn hosts(&self) -> Result<Vec<HostKey>, StoreError> {
        let file = self.load().await?;
        // BTreeMap iteration is already sorted.
        Ok(file
            .scripts
            .keys()
            .filter_map(|k| HostKey::from_string_key(k))
            .collect())
    }

    async fn entries(&self) -> Result<Vec<(HostKey, ScriptRecord)>, StoreError> {
        let file = self.load().await?;
        Ok(file
            .scripts
            .into_iter()
            .filter_map(|(k, v)| Some((HostKey::from_string_key(&k)?, ScriptRecord::from(v))))
            .collect())
    }
}
