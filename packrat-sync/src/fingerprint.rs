//! Directory fingerprinting.
//!
//! One SHA-256 digest over every regular file in the tree, visited in
//! sorted depth-first order so filesystem iteration order never affects the
//! result. Per file the hash absorbs, in this fixed order: the relative
//! path (`/`-separated, lossy UTF-8), a NUL, the byte size, the mtime
//! (unix seconds + nanos, big-endian), and the full file content.
//!
//! The reserved record filename ([`FINGERPRINT_FILENAME`]) is skipped at
//! every level, so the record never perturbs the digest of the data it
//! describes. Symlinks are not followed.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};

use packrat_core::types::{Fingerprint, FINGERPRINT_FILENAME};

use crate::error::{io_err, SyncError};

/// One regular file yielded by [`walk`].
#[derive(Debug)]
pub struct FileEntry {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub metadata: Metadata,
}

/// Sorted depth-first walk over the regular files under `root`.
///
/// Lazy: directories are read as the iterator advances, so memory stays
/// bounded by tree depth and a caller may stop between files.
pub fn walk(root: &Path) -> Walk {
    Walk {
        root: root.to_path_buf(),
        stack: vec![Frame::Dir(root.to_path_buf())],
    }
}

enum Frame {
    Dir(PathBuf),
    File(PathBuf),
}

pub struct Walk {
    root: PathBuf,
    stack: Vec<Frame>,
}

impl Walk {
    fn read_dir_sorted(&self, dir: &Path) -> Result<Vec<Frame>, SyncError> {
        let mut entries: Vec<(String, PathBuf, std::fs::FileType)> = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
            entries.push((
                entry.file_name().to_string_lossy().into_owned(),
                entry.path(),
                file_type,
            ));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Pushed in reverse so the stack pops lexicographically.
        let mut frames = Vec::new();
        for (name, path, file_type) in entries.into_iter().rev() {
            if file_type.is_dir() {
                frames.push(Frame::Dir(path));
            } else if file_type.is_file() && name != FINGERPRINT_FILENAME {
                frames.push(Frame::File(path));
            }
        }
        Ok(frames)
    }
}

impl Iterator for Walk {
    type Item = Result<FileEntry, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Frame::Dir(dir) => match self.read_dir_sorted(&dir) {
                    Ok(frames) => self.stack.extend(frames),
                    Err(err) => return Some(Err(err)),
                },
                Frame::File(path) => {
                    let metadata = match std::fs::metadata(&path) {
                        Ok(m) => m,
                        Err(e) => return Some(Err(io_err(&path, e))),
                    };
                    let relative = path
                        .strip_prefix(&self.root)
                        .unwrap_or(&path)
                        .to_path_buf();
                    return Some(Ok(FileEntry {
                        path,
                        relative,
                        metadata,
                    }));
                }
            }
        }
    }
}

/// Compute the fingerprint of the directory tree rooted at `root`.
///
/// Fails with an I/O error if `root` is unreadable. An empty directory has
/// a well-defined fingerprint (the digest of no input).
pub fn fingerprint(root: &Path) -> Result<Fingerprint, SyncError> {
    let mut hasher = Sha256::new();
    for entry in walk(root) {
        let entry = entry?;
        let rel = relative_key(&entry.relative);
        let mtime = entry
            .metadata
            .modified()
            .map_err(|e| io_err(&entry.path, e))?;
        let since_epoch = mtime.duration_since(UNIX_EPOCH).unwrap_or_default();

        hasher.update(rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.metadata.len().to_be_bytes());
        hasher.update(since_epoch.as_secs().to_be_bytes());
        hasher.update(since_epoch.subsec_nanos().to_be_bytes());
        let content = std::fs::read(&entry.path).map_err(|e| io_err(&entry.path, e))?;
        hasher.update(&content);
    }
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}

/// Platform-independent relative path encoding: `/` separators, lossy UTF-8.
fn relative_key(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
