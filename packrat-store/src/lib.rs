//! # packrat-store
//!
//! The object-store collaborator: a provider-agnostic [`ObjectStore`] trait,
//! a Drive-style HTTP implementation ([`DriveStore`]) and an in-memory store
//! ([`MemoryStore`]) for tests.
//!
//! The trait is deliberately blocking: the orchestrator is a strictly
//! sequential pipeline, so async buys nothing here.

pub mod drive;
pub mod error;
pub mod memory;

use chrono::{DateTime, Utc};

use packrat_core::types::FileId;

pub use drive::DriveStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// Metadata for one remote object, as returned by [`ObjectStore::list_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: FileId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_folder: bool,
}

/// Abstract remote file/folder API.
///
/// Implementations own authentication, per-call timeouts and pagination; the
/// caller sees plain blocking calls. Every method maps one remote operation;
/// no method retries.
pub trait ObjectStore {
    /// Look up a top-level folder by display name.
    fn find_folder(&self, name: &str) -> Result<Option<FileId>, StoreError>;

    /// Create a top-level folder with the given display name.
    fn create_folder(&self, name: &str) -> Result<FileId, StoreError>;

    /// List the direct children of `parent`, newest first.
    fn list_files(&self, parent: &FileId) -> Result<Vec<RemoteFile>, StoreError>;

    /// Create a file under `parent` and return its id.
    fn create_file(
        &self,
        parent: &FileId,
        name: &str,
        mime: &str,
        content: &[u8],
    ) -> Result<FileId, StoreError>;

    /// Replace the content of an existing file.
    fn update_file(&self, id: &FileId, content: &[u8]) -> Result<(), StoreError>;

    /// Download the full content of a file.
    fn file_content(&self, id: &FileId) -> Result<Vec<u8>, StoreError>;

    /// Permanently delete a file. Not undoable.
    fn delete_file(&self, id: &FileId) -> Result<(), StoreError>;
}
