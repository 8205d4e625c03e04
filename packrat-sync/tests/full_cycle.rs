//! End-to-end scenarios across fingerprinter, archiver, record and runner,
//! against the in-memory store.

use std::path::Path;

use tempfile::TempDir;

use packrat_core::config::Config;
use packrat_core::types::{FolderName, RetentionCount, RunMode, FINGERPRINT_FILENAME};
use packrat_store::{MemoryStore, ObjectStore};
use packrat_sync::run;

fn config_for(dir: &Path, keep: u32) -> Config {
    Config {
        source_dir: dir.to_path_buf(),
        folder: FolderName::from("Backups"),
        retention: RetentionCount::new(keep).unwrap(),
        token: None,
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn archive_names(store: &MemoryStore, folder: &packrat_core::types::FileId) -> Vec<String> {
    store
        .list_files(folder)
        .unwrap()
        .into_iter()
        .filter(|f| !f.is_folder && f.name != FINGERPRINT_FILENAME)
        .map(|f| f.name)
        .collect()
}

#[test]
fn publish_wipe_restore_republish() {
    let store = MemoryStore::new();
    let workspace = TempDir::new().unwrap();
    let source = workspace.path().join("docs");
    write(&source.join("notes.txt"), "important");
    write(&source.join("projects/plan.md"), "# plan");

    // First sync publishes an archive and the record.
    let first = run(&store, &config_for(&source, 3), RunMode::Sync).unwrap();
    assert!(first.published.is_some());
    let folder = store.find_folder("Backups").unwrap().unwrap();
    assert_eq!(archive_names(&store, &folder).len(), 1);

    // Simulate losing the local copy.
    std::fs::remove_dir_all(&source).unwrap();

    // Next sync restores the tree from the archive.
    let second = run(&store, &config_for(&source, 3), RunMode::Sync).unwrap();
    assert_eq!(second.restored_from, first.published);
    assert_eq!(
        std::fs::read_to_string(source.join("notes.txt")).unwrap(),
        "important"
    );
    assert_eq!(
        std::fs::read_to_string(source.join("projects/plan.md")).unwrap(),
        "# plan"
    );

    // A further sync with no edits publishes nothing.
    let third_cfg = config_for(&source, 3);
    let third = run(&store, &third_cfg, RunMode::Sync).unwrap();
    assert_eq!(third.published, None);
}

#[test]
fn repeated_backups_respect_retention() {
    let store = MemoryStore::new();
    let source = TempDir::new().unwrap();
    write(&source.path().join("data.bin"), "payload");

    let cfg = config_for(source.path(), 2);
    for _ in 0..4 {
        run(&store, &cfg, RunMode::Backup).unwrap();
    }

    let folder = store.find_folder("Backups").unwrap().unwrap();
    assert_eq!(archive_names(&store, &folder).len(), 2);
}

#[test]
fn sync_after_edit_replaces_record_value() {
    let store = MemoryStore::new();
    let source = TempDir::new().unwrap();
    write(&source.path().join("a.txt"), "one");

    let cfg = config_for(source.path(), 3);
    run(&store, &cfg, RunMode::Sync).unwrap();
    let folder = store.find_folder("Backups").unwrap().unwrap();
    let before = store
        .content_by_name(&folder, FINGERPRINT_FILENAME)
        .unwrap();

    write(&source.path().join("a.txt"), "two-and-more");
    let report = run(&store, &cfg, RunMode::Sync).unwrap();

    let after = store
        .content_by_name(&folder, FINGERPRINT_FILENAME)
        .unwrap();
    assert_ne!(before, after);
    assert_eq!(
        String::from_utf8(after).unwrap(),
        report.fingerprint.unwrap().0
    );
    // The record was updated in place: still exactly one record object.
    let records = store
        .list_files(&folder)
        .unwrap()
        .into_iter()
        .filter(|f| f.name == FINGERPRINT_FILENAME)
        .count();
    assert_eq!(records, 1);
}
