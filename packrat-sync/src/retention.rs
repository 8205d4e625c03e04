//! Retention pruning: keep the N most recent archives, delete the rest.

use packrat_core::types::{FileId, RetentionCount, FINGERPRINT_FILENAME};
use packrat_store::{ObjectStore, RemoteFile};

use crate::error::SyncError;

/// Prune the target folder down to the `keep` most recently created
/// archives. Folders and the fingerprint record are never candidates.
///
/// Deletion is unconditional and irreversible. Returns the deleted files,
/// oldest last.
pub fn prune(
    store: &dyn ObjectStore,
    folder: &FileId,
    keep: RetentionCount,
) -> Result<Vec<RemoteFile>, SyncError> {
    let mut archives: Vec<RemoteFile> = store
        .list_files(folder)?
        .into_iter()
        .filter(|f| !f.is_folder && f.name != FINGERPRINT_FILENAME)
        .collect();
    // Newest first.
    archives.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if archives.len() <= keep.get() {
        tracing::debug!(
            "retention: {} archive(s) present, keeping all (limit {keep})",
            archives.len()
        );
        return Ok(Vec::new());
    }

    let expired = archives.split_off(keep.get());
    for file in &expired {
        store.delete_file(&file.id)?;
        tracing::info!("pruned expired archive '{}'", file.name);
    }
    Ok(expired)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
