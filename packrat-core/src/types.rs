//! Domain types for packrat.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reserved names
// ---------------------------------------------------------------------------

/// Name of the remote fingerprint record object inside the target folder.
///
/// A local file with this name is excluded from fingerprinting so the record
/// never perturbs the digest of the data it describes.
pub const FINGERPRINT_FILENAME: &str = ".packrat-fingerprint";

/// Content type of uploaded backup archives.
pub const ARCHIVE_MIME: &str = "application/gzip";

/// Content type of the fingerprint record object.
pub const RECORD_MIME: &str = "text/plain";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A hex-encoded SHA-256 digest summarizing a directory tree's file paths,
/// sizes, mtimes, and contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed display name for the remote target folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderName(pub String);

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FolderName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FolderName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a remote object (file or folder).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Retention count
// ---------------------------------------------------------------------------

/// How many backup archives to keep in the target folder. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RetentionCount(u32);

impl RetentionCount {
    pub fn new(n: u32) -> Result<Self, String> {
        if n == 0 {
            return Err("retention count must be at least 1".to_owned());
        }
        Ok(Self(n))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for RetentionCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u32> for RetentionCount {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<RetentionCount> for u32 {
    fn from(r: RetentionCount) -> Self {
        r.0
    }
}

impl FromStr for RetentionCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .parse()
            .map_err(|_| format!("'{s}' is not a positive integer"))?;
        Self::new(n)
    }
}

impl fmt::Display for RetentionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Run mode
// ---------------------------------------------------------------------------

/// Which orchestration to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Always pack and upload a fresh archive.
    Backup,
    /// Restore when the source is empty, then publish only on change.
    Sync,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Backup => write!(f, "backup"),
            RunMode::Sync => write!(f, "sync"),
        }
    }
}

// ---------------------------------------------------------------------------
// Archive naming
// ---------------------------------------------------------------------------

/// Remote name for an archive created at `timestamp`.
///
/// RFC 3339 UTC with colons replaced by hyphens (safe on every filesystem the
/// archive may transit) and subseconds truncated:
/// `backup-2024-05-01T12-30-05Z.tar.gz`
pub fn archive_name(timestamp: DateTime<Utc>) -> String {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Secs, true)
        .replace(':', "-");
    format!("backup-{stamp}.tar.gz")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
