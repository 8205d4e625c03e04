//! Backup/sync orchestration.
//!
//! One strictly sequential pipeline per run; no operation starts before its
//! predecessor completes, nothing is retried, and the first failure aborts
//! the whole run. The caller (cron, launchd, a hand on a keyboard) is
//! responsible for not overlapping runs against the same target folder.
//!
//! ## Sync mode
//!
//! ```text
//! Check-Empty ──empty/missing──▶ Restore ──▶ Detect-Changes ──▶ Done
//!      │                                          │
//!      └────────────non-empty─────────────────────┤
//!                                                 ▼
//!                                        Backup-And-Publish ──▶ Done
//! ```
//!
//! Backup mode skips every decision: pack, upload, prune, every time.

use std::path::{Path, PathBuf};

use chrono::Utc;

use packrat_core::config::Config;
use packrat_core::types::{
    archive_name, FileId, Fingerprint, RunMode, ARCHIVE_MIME, FINGERPRINT_FILENAME,
};
use packrat_store::ObjectStore;

use crate::error::{io_err, SyncError};
use crate::{fingerprint, record, retention};

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Outcome of one run, for the CLI to print.
#[derive(Debug)]
pub struct RunReport {
    pub mode: RunMode,
    /// Name of the archive the source directory was restored from.
    pub restored_from: Option<String>,
    /// Name of the archive uploaded by this run.
    pub published: Option<String>,
    /// Names of archives deleted by retention pruning.
    pub pruned: Vec<String>,
    /// Fingerprint computed by this run (sync mode only).
    pub fingerprint: Option<Fingerprint>,
}

impl RunReport {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            restored_from: None,
            published: None,
            pruned: Vec::new(),
            fingerprint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Drive one end-to-end run in the given mode.
pub fn run(
    store: &dyn ObjectStore,
    config: &Config,
    mode: RunMode,
) -> Result<RunReport, SyncError> {
    match mode {
        RunMode::Backup => run_backup(store, config),
        RunMode::Sync => run_sync(store, config),
    }
}

/// Backup mode: pack → upload → prune → delete local copy. Unconditional.
pub fn run_backup(store: &dyn ObjectStore, config: &Config) -> Result<RunReport, SyncError> {
    let folder = ensure_folder(store, config)?;
    let mut report = RunReport::new(RunMode::Backup);

    let name = upload_archive(store, &folder, &config.source_dir)?;
    report.published = Some(name);
    report.pruned = prune_names(store, &folder, config)?;
    Ok(report)
}

/// Sync mode: restore when the source is empty or missing, then publish
/// only when the fingerprint differs from the remote record.
pub fn run_sync(store: &dyn ObjectStore, config: &Config) -> Result<RunReport, SyncError> {
    let folder = ensure_folder(store, config)?;
    let mut report = RunReport::new(RunMode::Sync);

    // Check-Empty → Restore. Only an empty or missing source triggers a
    // restore; a non-empty directory is never overwritten.
    if is_empty_or_missing(&config.source_dir)? {
        report.restored_from = restore(store, &folder, &config.source_dir)?;
    }

    // Detect-Changes.
    let current = fingerprint::fingerprint(&config.source_dir)?;
    let stored = record::load(store, &folder)?;
    report.fingerprint = Some(current.clone());

    match &stored {
        Some((_, known)) if known == &current => {
            tracing::info!("fingerprint unchanged ({current}); nothing to publish");
            return Ok(report);
        }
        Some((_, known)) => {
            tracing::info!("fingerprint changed {known} → {current}");
        }
        None => {
            tracing::info!("no fingerprint record; first publish");
        }
    }

    // Backup-And-Publish.
    let name = upload_archive(store, &folder, &config.source_dir)?;
    let record_id = stored.as_ref().map(|(id, _)| id);
    record::publish(store, &folder, record_id, &current)?;
    report.published = Some(name);
    report.pruned = prune_names(store, &folder, config)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn ensure_folder(store: &dyn ObjectStore, config: &Config) -> Result<FileId, SyncError> {
    match store.find_folder(&config.folder.0)? {
        Some(id) => Ok(id),
        None => Ok(store.create_folder(&config.folder.0)?),
    }
}

fn is_empty_or_missing(dir: &Path) -> Result<bool, SyncError> {
    if !dir.exists() {
        return Ok(true);
    }
    let mut entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    Ok(entries.next().is_none())
}

/// Pack `source_dir` to a local temp archive, upload it, delete the local
/// copy. Returns the remote name.
fn upload_archive(
    store: &dyn ObjectStore,
    folder: &FileId,
    source_dir: &Path,
) -> Result<String, SyncError> {
    let name = archive_name(Utc::now());
    let local = temp_path(&name);

    let result: Result<String, SyncError> = (|| {
        packrat_archive::pack(source_dir, &local)?;
        let content = std::fs::read(&local).map_err(|e| io_err(&local, e))?;
        store.create_file(folder, &name, ARCHIVE_MIME, &content)?;
        Ok(name.clone())
    })();
    // The local copy is transient either way.
    let _ = std::fs::remove_file(&local);
    result
}

/// Download the most recent archive into `source_dir`. `Ok(None)` when the
/// folder holds no archives; the source directory is then created empty.
fn restore(
    store: &dyn ObjectStore,
    folder: &FileId,
    source_dir: &Path,
) -> Result<Option<String>, SyncError> {
    let newest = store
        .list_files(folder)?
        .into_iter()
        .find(|f| !f.is_folder && f.name != FINGERPRINT_FILENAME);

    let Some(archive) = newest else {
        tracing::info!("no remote archives; starting from an empty source directory");
        std::fs::create_dir_all(source_dir).map_err(|e| io_err(source_dir, e))?;
        return Ok(None);
    };

    tracing::info!("restoring from '{}'", archive.name);
    let local = temp_path(&format!("restore-{}", archive.name));
    let result: Result<Option<String>, SyncError> = (|| {
        let content = store.file_content(&archive.id)?;
        std::fs::write(&local, &content).map_err(|e| io_err(&local, e))?;
        packrat_archive::unpack(&local, source_dir)?;
        Ok(Some(archive.name.clone()))
    })();
    let _ = std::fs::remove_file(&local);
    result
}

fn prune_names(
    store: &dyn ObjectStore,
    folder: &FileId,
    config: &Config,
) -> Result<Vec<String>, SyncError> {
    let deleted = retention::prune(store, folder, config.retention)?;
    Ok(deleted.into_iter().map(|f| f.name).collect())
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("packrat-{}-{name}", std::process::id()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
