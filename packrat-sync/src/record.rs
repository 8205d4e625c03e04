//! The remote fingerprint record.
//!
//! A single reserved-name object in the target folder holding the
//! last-published fingerprint as plain hex text. At most one exists per
//! folder: it is created on first publish and updated in place afterwards.

use packrat_core::types::{FileId, Fingerprint, FINGERPRINT_FILENAME, RECORD_MIME};
use packrat_store::ObjectStore;

use crate::error::SyncError;

/// Load the record from the target folder.
///
/// `Ok(None)` means the record genuinely does not exist (first run). A
/// record that is present but cannot be fetched or decoded is
/// [`SyncError::RecordUnreadable`] — the caller decides the policy; the
/// orchestrator fails the run.
pub fn load(
    store: &dyn ObjectStore,
    folder: &FileId,
) -> Result<Option<(FileId, Fingerprint)>, SyncError> {
    let files = store.list_files(folder)?;
    let Some(record) = files
        .into_iter()
        .find(|f| !f.is_folder && f.name == FINGERPRINT_FILENAME)
    else {
        return Ok(None);
    };

    let bytes = store
        .file_content(&record.id)
        .map_err(|e| unreadable(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| unreadable(e.to_string()))?;
    let value = text.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(unreadable(format!("not a hex digest: '{value}'")));
    }
    Ok(Some((record.id, Fingerprint::from(value))))
}

/// Write the record: update in place when it exists, create it otherwise.
pub fn publish(
    store: &dyn ObjectStore,
    folder: &FileId,
    existing: Option<&FileId>,
    fingerprint: &Fingerprint,
) -> Result<(), SyncError> {
    match existing {
        Some(id) => {
            store.update_file(id, fingerprint.0.as_bytes())?;
            tracing::info!("updated fingerprint record → {fingerprint}");
        }
        None => {
            store.create_file(folder, FINGERPRINT_FILENAME, RECORD_MIME, fingerprint.0.as_bytes())?;
            tracing::info!("created fingerprint record → {fingerprint}");
        }
    }
    Ok(())
}

fn unreadable(reason: String) -> SyncError {
    SyncError::RecordUnreadable {
        name: FINGERPRINT_FILENAME.to_owned(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use packrat_store::MemoryStore;

    #[test]
    fn absent_record_is_none() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();
        assert!(load(&store, &folder).unwrap().is_none());
    }

    #[test]
    fn publish_creates_then_updates_in_place() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();

        publish(&store, &folder, None, &Fingerprint::from("ab12")).unwrap();
        let (id, fp) = load(&store, &folder).unwrap().unwrap();
        assert_eq!(fp, Fingerprint::from("ab12"));

        publish(&store, &folder, Some(&id), &Fingerprint::from("cd34")).unwrap();
        let (id2, fp2) = load(&store, &folder).unwrap().unwrap();
        assert_eq!(id2, id, "record must be overwritten, not duplicated");
        assert_eq!(fp2, Fingerprint::from("cd34"));
        assert_eq!(store.file_count(&folder), 1);
    }

    #[test]
    fn garbage_record_is_unreadable_not_absent() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();
        store
            .create_file(&folder, FINGERPRINT_FILENAME, RECORD_MIME, b"not hex!")
            .unwrap();

        match load(&store, &folder) {
            Err(SyncError::RecordUnreadable { name, .. }) => {
                assert_eq!(name, FINGERPRINT_FILENAME);
            }
            other => panic!("expected RecordUnreadable, got {other:?}"),
        }
    }

    #[test]
    fn record_trims_trailing_newline() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();
        store
            .create_file(&folder, FINGERPRINT_FILENAME, RECORD_MIME, b"ab12\n")
            .unwrap();
        let (_, fp) = load(&store, &folder).unwrap().unwrap();
        assert_eq!(fp, Fingerprint::from("ab12"));
    }
}
