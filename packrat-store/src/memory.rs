//! In-memory [`ObjectStore`] used by orchestrator tests.
//!
//! Creation timestamps advance by one second per created object, so
//! "newest first" ordering is deterministic without sleeping in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use packrat_core::types::FileId;

use crate::{ObjectStore, RemoteFile, StoreError};

#[derive(Debug, Clone)]
struct StoredFile {
    name: String,
    parent: Option<FileId>,
    created_at: DateTime<Utc>,
    is_folder: bool,
    content: Vec<u8>,
}

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, StoredFile>,
    next_id: u64,
    ticks: i64,
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-folder children of `parent`. Test helper.
    pub fn file_count(&self, parent: &FileId) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .files
            .values()
            .filter(|f| f.parent.as_ref() == Some(parent) && !f.is_folder)
            .count()
    }

    /// Create a folder *inside* another folder. The [`ObjectStore`] trait
    /// only creates top-level folders; tests use this to verify that
    /// listings and pruning handle nested folders.
    pub fn create_subfolder(&self, parent: &FileId, name: &str) -> FileId {
        let mut inner = self.inner.lock().unwrap();
        Self::alloc(&mut inner, name, Some(parent.clone()), true, Vec::new())
    }

    /// Raw content of the named child of `parent`, if present. Test helper.
    pub fn content_by_name(&self, parent: &FileId, name: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner
            .files
            .values()
            .find(|f| f.parent.as_ref() == Some(parent) && f.name == name)
            .map(|f| f.content.clone())
    }

    fn alloc(inner: &mut Inner, name: &str, parent: Option<FileId>, is_folder: bool, content: Vec<u8>) -> FileId {
        inner.next_id += 1;
        inner.ticks += 1;
        let id = FileId(format!("mem-{}", inner.next_id));
        let created_at =
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(inner.ticks);
        inner.files.insert(
            id.0.clone(),
            StoredFile {
                name: name.to_owned(),
                parent,
                created_at,
                is_folder,
                content,
            },
        );
        id
    }

    fn missing(id: &FileId) -> StoreError {
        StoreError::Api {
            status: 404,
            message: format!("no such file: {}", id.0),
        }
    }
}

impl ObjectStore for MemoryStore {
    fn find_folder(&self, name: &str) -> Result<Option<FileId>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .files
            .iter()
            .find(|(_, f)| f.is_folder && f.parent.is_none() && f.name == name)
            .map(|(id, _)| FileId(id.clone())))
    }

    fn create_folder(&self, name: &str) -> Result<FileId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(Self::alloc(&mut inner, name, None, true, Vec::new()))
    }

    fn list_files(&self, parent: &FileId) -> Result<Vec<RemoteFile>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut files: Vec<RemoteFile> = inner
            .files
            .iter()
            .filter(|(_, f)| f.parent.as_ref() == Some(parent))
            .map(|(id, f)| RemoteFile {
                id: FileId(id.clone()),
                name: f.name.clone(),
                created_at: f.created_at,
                is_folder: f.is_folder,
            })
            .collect();
        // Newest first, matching the Drive client's orderBy.
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    fn create_file(
        &self,
        parent: &FileId,
        name: &str,
        _mime: &str,
        content: &[u8],
    ) -> Result<FileId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.files.contains_key(&parent.0) {
            return Err(Self::missing(parent));
        }
        Ok(Self::alloc(
            &mut inner,
            name,
            Some(parent.clone()),
            false,
            content.to_vec(),
        ))
    }

    fn update_file(&self, id: &FileId, content: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let file = inner.files.get_mut(&id.0).ok_or_else(|| Self::missing(id))?;
        file.content = content.to_vec();
        Ok(())
    }

    fn file_content(&self, id: &FileId) -> Result<Vec<u8>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let file = inner.files.get(&id.0).ok_or_else(|| Self::missing(id))?;
        Ok(file.content.clone())
    }

    fn delete_file(&self, id: &FileId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .files
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_are_found_by_name() {
        let store = MemoryStore::new();
        assert_eq!(store.find_folder("Backups").unwrap(), None);
        let id = store.create_folder("Backups").unwrap();
        assert_eq!(store.find_folder("Backups").unwrap(), Some(id));
    }

    #[test]
    fn listing_is_newest_first() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();
        store.create_file(&folder, "a", "text/plain", b"1").unwrap();
        store.create_file(&folder, "b", "text/plain", b"2").unwrap();
        store.create_file(&folder, "c", "text/plain", b"3").unwrap();

        let names: Vec<String> = store
            .list_files(&folder)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn update_replaces_content_in_place() {
        let store = MemoryStore::new();
        let folder = store.create_folder("Backups").unwrap();
        let id = store
            .create_file(&folder, "record", "text/plain", b"old")
            .unwrap();
        store.update_file(&id, b"new").unwrap();
        assert_eq!(store.file_content(&id).unwrap(), b"new");
        assert_eq!(store.file_count(&folder), 1);
    }

    #[test]
    fn delete_of_unknown_id_is_api_error() {
        let store = MemoryStore::new();
        let err = store.delete_file(&FileId::from("nope")).unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 404, .. }));
    }
}
