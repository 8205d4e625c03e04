//! Drive-style HTTP object store.
//!
//! Talks to a Google-Drive-v3-compatible REST surface with a bearer token:
//! `files.list` with a `q` filter for lookup and listing, multipart
//! (`uploadType=multipart`) create, media (`uploadType=media`) update,
//! `alt=media` download, and plain DELETE.
//!
//! Pagination is capped at one page of 1000 entries; a backup folder holding
//! more than 1000 objects is far beyond any sane retention count.

use std::io::Read;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use packrat_core::types::FileId;

use crate::{ObjectStore, RemoteFile, StoreError};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Files larger than this are rejected before upload; the multipart body is
/// built in memory.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Bearer-token Drive client.
pub struct DriveStore {
    agent: ureq::Agent,
    token: String,
    base_url: String,
    upload_url: String,
}

impl DriveStore {
    /// Client against the public Drive API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_urls(token, DEFAULT_BASE_URL, DEFAULT_UPLOAD_URL)
    }

    /// Client against an alternate endpoint (tests, self-hosted gateways).
    pub fn with_base_urls(
        token: impl Into<String>,
        base_url: impl Into<String>,
        upload_url: impl Into<String>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(120))
            .build();
        Self {
            agent,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            upload_url: upload_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn query_files(&self, q: &str) -> Result<Vec<DriveFile>, StoreError> {
        let response = self
            .agent
            .get(&format!("{}/files", self.base_url))
            .set("Authorization", &self.bearer())
            .query("q", q)
            .query("orderBy", "createdTime desc")
            .query("pageSize", "1000")
            .query("fields", "files(id,name,mimeType,createdTime)")
            .call()?;
        let list: FileList = response
            .into_json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(list.files)
    }
}

impl ObjectStore for DriveStore {
    fn find_folder(&self, name: &str) -> Result<Option<FileId>, StoreError> {
        let q = format!(
            "name = '{}' and mimeType = '{FOLDER_MIME}' and trashed = false",
            escape_query_value(name)
        );
        let files = self.query_files(&q)?;
        Ok(files.into_iter().next().map(|f| FileId(f.id)))
    }

    fn create_folder(&self, name: &str) -> Result<FileId, StoreError> {
        let response = self
            .agent
            .post(&format!("{}/files", self.base_url))
            .set("Authorization", &self.bearer())
            .send_json(serde_json::json!({
                "name": name,
                "mimeType": FOLDER_MIME,
            }))?;
        let created: CreatedFile = response
            .into_json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::info!("created remote folder '{name}' ({})", created.id);
        Ok(FileId(created.id))
    }

    fn list_files(&self, parent: &FileId) -> Result<Vec<RemoteFile>, StoreError> {
        let q = format!("'{}' in parents and trashed = false", parent.0);
        let files = self.query_files(&q)?;
        files
            .into_iter()
            .map(|f| {
                let created_at = parse_created(&f)?;
                Ok(RemoteFile {
                    id: FileId(f.id),
                    is_folder: f.mime_type.as_deref() == Some(FOLDER_MIME),
                    name: f.name,
                    created_at,
                })
            })
            .collect()
    }

    fn create_file(
        &self,
        parent: &FileId,
        name: &str,
        mime: &str,
        content: &[u8],
    ) -> Result<FileId, StoreError> {
        if content.len() > MAX_UPLOAD_BYTES {
            return Err(StoreError::Api {
                status: 0,
                message: format!(
                    "refusing to upload {} bytes (limit {MAX_UPLOAD_BYTES})",
                    content.len()
                ),
            });
        }

        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent.0],
            "mimeType": mime,
        });
        let (body, content_type) = multipart_related(&metadata.to_string(), mime, content);

        let response = self
            .agent
            .post(&format!("{}/files", self.upload_url))
            .set("Authorization", &self.bearer())
            .set("Content-Type", &content_type)
            .query("uploadType", "multipart")
            .send_bytes(&body)?;
        let created: CreatedFile = response
            .into_json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::info!(
            "uploaded '{name}' ({} bytes) as {}",
            content.len(),
            created.id
        );
        Ok(FileId(created.id))
    }

    fn update_file(&self, id: &FileId, content: &[u8]) -> Result<(), StoreError> {
        self.agent
            .request("PATCH", &format!("{}/files/{}", self.upload_url, id.0))
            .set("Authorization", &self.bearer())
            .query("uploadType", "media")
            .send_bytes(content)?;
        Ok(())
    }

    fn file_content(&self, id: &FileId) -> Result<Vec<u8>, StoreError> {
        let response = self
            .agent
            .get(&format!("{}/files/{}", self.base_url, id.0))
            .set("Authorization", &self.bearer())
            .query("alt", "media")
            .call()?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(bytes)
    }

    fn delete_file(&self, id: &FileId) -> Result<(), StoreError> {
        self.agent
            .delete(&format!("{}/files/{}", self.base_url, id.0))
            .set("Authorization", &self.bearer())
            .call()?;
        tracing::debug!("deleted remote file {}", id.0);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire types and helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(rename = "createdTime")]
    created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

fn parse_created(f: &DriveFile) -> Result<DateTime<Utc>, StoreError> {
    let raw = f.created_time.as_deref().ok_or_else(|| {
        StoreError::Decode(format!("file '{}' has no createdTime", f.name))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("bad createdTime '{raw}': {e}")))
}

/// Escape a string for interpolation into a Drive `q` expression.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build a `multipart/related` body: JSON metadata part + content part.
fn multipart_related(metadata: &str, mime: &str, content: &[u8]) -> (Vec<u8>, String) {
    let boundary = "packrat-a718d2f0c4";
    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("--{boundary}\r\nContent-Type: {mime}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (body, format!("multipart/related; boundary={boundary}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
