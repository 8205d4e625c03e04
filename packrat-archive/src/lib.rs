//! # packrat-archive
//!
//! Streaming tar+gzip pack/unpack of a source directory.
//!
//! Entry paths inside the archive are relative to the packed directory, so
//! an archive unpacks into any target location without leaking absolute
//! paths from the machine that created it.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

/// All errors that can arise from pack/unpack.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.into(),
        source,
    }
}

/// Pack the contents of `source_dir` into a gzip-compressed tar at
/// `archive_path`.
///
/// The directory itself is not an entry; its children are archived with
/// paths relative to it.
pub fn pack(source_dir: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let file = File::create(archive_path).map_err(|e| io_err(archive_path, e))?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    builder
        .append_dir_all(".", source_dir)
        .map_err(|e| io_err(source_dir, e))?;

    let encoder = builder.into_inner().map_err(|e| io_err(archive_path, e))?;
    encoder.finish().map_err(|e| io_err(archive_path, e))?;
    tracing::debug!(
        "packed {} into {}",
        source_dir.display(),
        archive_path.display()
    );
    Ok(())
}

/// Unpack a gzip-compressed tar at `archive_path` into `target_dir`,
/// creating the directory if it does not exist.
pub fn unpack(archive_path: &Path, target_dir: &Path) -> Result<(), ArchiveError> {
    std::fs::create_dir_all(target_dir).map_err(|e| io_err(target_dir, e))?;
    let file = File::open(archive_path).map_err(|e| io_err(archive_path, e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(target_dir)
        .map_err(|e| io_err(target_dir, e))?;
    tracing::debug!(
        "unpacked {} into {}",
        archive_path.display(),
        target_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn pack_then_unpack_restores_tree() {
        let source = TempDir::new().unwrap();
        write(&source.path().join("a.txt"), "alpha");
        write(&source.path().join("nested/deep/b.txt"), "beta");

        let work = TempDir::new().unwrap();
        let archive = work.path().join("snap.tar.gz");
        pack(source.path(), &archive).unwrap();

        let target = work.path().join("restored");
        unpack(&archive, &target).unwrap();

        assert_eq!(
            std::fs::read_to_string(target.join("a.txt")).unwrap(),
            "alpha"
        );
        assert_eq!(
            std::fs::read_to_string(target.join("nested/deep/b.txt")).unwrap(),
            "beta"
        );
    }

    #[test]
    fn packing_empty_directory_yields_unpackable_archive() {
        let source = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let archive = work.path().join("empty.tar.gz");
        pack(source.path(), &archive).unwrap();

        let target = work.path().join("restored");
        unpack(&archive, &target).unwrap();
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn archive_is_gzip() {
        let source = TempDir::new().unwrap();
        write(&source.path().join("a.txt"), "alpha");
        let work = TempDir::new().unwrap();
        let archive = work.path().join("snap.tar.gz");
        pack(source.path(), &archive).unwrap();

        let bytes = std::fs::read(&archive).unwrap();
        assert_eq!(bytes[0], 0x1f, "missing gzip magic");
        assert_eq!(bytes[1], 0x8b, "missing gzip magic");
    }

    #[test]
    fn pack_of_missing_source_fails_with_path() {
        let work = TempDir::new().unwrap();
        let archive = work.path().join("snap.tar.gz");
        let missing = work.path().join("does-not-exist");
        let err = pack(&missing, &archive).unwrap_err();
        let ArchiveError::Io { path, .. } = err;
        assert_eq!(path, missing);
    }
}
