//! Error types for packrat-sync.

use std::path::PathBuf;

use thiserror::Error;

use packrat_archive::ArchiveError;
use packrat_core::error::ConfigError;
use packrat_store::StoreError;

/// All errors that can arise from a backup/sync run.
///
/// No variant is retried; the first failure aborts the whole run and the
/// external scheduler re-runs later from scratch.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration was missing or invalid. Raised before any remote call.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An object-store call failed.
    #[error("object store error: {0}")]
    Store(#[from] StoreError),

    /// Packing or unpacking an archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A local I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote fingerprint record exists but could not be read or decoded.
    ///
    /// Distinct from the record being absent: absent means "publish", while
    /// unreadable aborts the run so a transient fetch failure never forces a
    /// spurious re-backup.
    #[error("remote fingerprint record '{name}' exists but could not be read: {reason}")]
    RecordUnreadable { name: String, reason: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
