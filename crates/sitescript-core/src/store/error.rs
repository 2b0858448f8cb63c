//! Script store error type.

use std::path::PathBuf;

/// Failure of the underlying storage medium.
///
/// Stores surface these instead of swallowing them; the handshake session
/// decides how to degrade (see `handshake::SaveStatus`).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed (permissions, disk full, ...).
    #[error("script store I/O at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The backing JSON document exists but does not parse.
    #[error("corrupt script store {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The backing JSON document was written by an incompatible version.
    #[error("unsupported script store version {found} in {}", .path.display())]
    UnsupportedVersion { path: PathBuf, found: u32 },
    #[error("serialize script store: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("sqlite: {0}")]
    Sqlite(#[from] sqlx::Error),
    /// A blocking store task panicked or was cancelled.
    #[error("script store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("state directory unavailable: {0}")]
    StateDir(#[from] xdg::BaseDirectoriesError),
}
