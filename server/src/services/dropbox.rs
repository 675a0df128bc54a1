//! Dropbox HTTP API v2 client behind the `CloudStorage` trait.
//!
//! DESIGN
//! ======
//! Route and export code depend on `CloudStorage`, never on `DropboxClient`
//! directly, so tests substitute an in-memory store. Downloads return the
//! loose `RawDownload` shape; `fetch` normalizes it into a `DownloadedFile`
//! so callers only ever handle one content representation.
//!
//! Content endpoints (`files/download`, `files/upload`) pass their arguments
//! in the `Dropbox-API-Arg` header. Header values must be ASCII, so the JSON
//! is escaped with `\uXXXX` sequences for anything outside printable ASCII.

use std::fmt::Write;
use std::time::Duration;

use books::{BlobPayload, DownloadError, DownloadedFile, FileMetadata, RawDownload};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::config::DropboxConfig;

/// Root folder for everything the app writes.
pub const APP_ROOT: &str = "/Clustica";
const API_ARG_HEADER: &str = "Dropbox-API-Arg";
const API_RESULT_HEADER: &str = "dropbox-api-result";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cloud storage is not configured")]
    NotConfigured,
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("invalid storage path: {0:?}")]
    InvalidPath(String),
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("storage API error: status {status}")]
    Api { status: u16, body: String },
    #[error("storage response parse failed: {0}")]
    Parse(String),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl StorageError {
    /// Dropbox reports missing paths as `409` with a `not_found` error summary.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 409, body } if body.contains("not_found"))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Which payload field a download populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Raw bytes in `file_binary`.
    Binary,
    /// Bytes plus response MIME type in `file_blob`.
    Blob,
    /// UTF-8 text in `content`.
    Text,
}

#[async_trait::async_trait]
pub trait CloudStorage: Send + Sync {
    /// Download a file. The payload field populated depends on `mode`.
    async fn download(&self, path: &str, mode: DownloadMode) -> Result<RawDownload, StorageError>;

    /// Upload (overwrite) a file and return its new metadata.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<FileMetadata, StorageError>;

    /// List the files (not folders) directly inside `path`.
    async fn list_folder(&self, path: &str) -> Result<Vec<FileMetadata>, StorageError>;
}

/// Download and normalize a file in one step.
///
/// # Errors
///
/// Returns the storage error, or [`StorageError::Download`] when the result
/// carried no payload.
pub async fn fetch(storage: &dyn CloudStorage, path: &str, mode: DownloadMode) -> Result<DownloadedFile, StorageError> {
    let raw = storage.download(path, mode).await?;
    let file = raw.normalize()?;
    let mime = file.content.mime_type().unwrap_or("-");
    tracing::debug!(%path, mime, size = file.content.as_bytes().len(), "storage file fetched");
    Ok(file)
}

/// Storage path of a book's JSON snapshot.
#[must_use]
pub fn book_json_path(book_id: &str) -> String {
    format!("{APP_ROOT}/books/{book_id}.json")
}

/// Storage path of an exported EPUB.
#[must_use]
pub fn export_path(file_stem: &str) -> String {
    format!("{APP_ROOT}/exports/{file_stem}.epub")
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct DropboxClient {
    http: reqwest::Client,
    access_token: String,
    api_base_url: String,
    content_base_url: String,
}

impl DropboxClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: DropboxConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StorageError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            access_token: config.access_token,
            api_base_url: config.api_base_url,
            content_base_url: config.content_base_url,
        })
    }

    /// POST a JSON RPC body to the API host and return the response text.
    async fn rpc(&self, endpoint: &str, body: &Value) -> Result<String, StorageError> {
        let response = self
            .http
            .post(format!("{}/2/{endpoint}", self.api_base_url))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        read_success_text(response).await
    }
}

#[async_trait::async_trait]
impl CloudStorage for DropboxClient {
    async fn download(&self, path: &str, mode: DownloadMode) -> Result<RawDownload, StorageError> {
        let path = normalize_file_path(path)?;
        tracing::debug!(%path, ?mode, "dropbox download");

        let response = self
            .http
            .post(format!("{}/2/files/download", self.content_base_url))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, header_safe_json(&json!({ "path": path })))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, body });
        }

        let metadata_json = response
            .headers()
            .get(API_RESULT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StorageError::Parse("missing Dropbox-API-Result header".to_owned()))?;
        let metadata: FileMetadata =
            serde_json::from_str(metadata_json).map_err(|e| StorageError::Parse(e.to_string()))?;
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_owned();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        raw_download(metadata, mode, bytes.to_vec(), mime_type)
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<FileMetadata, StorageError> {
        let path = normalize_file_path(path)?;
        tracing::debug!(%path, size = bytes.len(), "dropbox upload");

        let arg = json!({ "path": path, "mode": "overwrite", "autorename": false, "mute": true });
        let response = self
            .http
            .post(format!("{}/2/files/upload", self.content_base_url))
            .bearer_auth(&self.access_token)
            .header(API_ARG_HEADER, header_safe_json(&arg))
            .header(CONTENT_TYPE, DEFAULT_MIME_TYPE)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let text = read_success_text(response).await?;
        serde_json::from_str(&text).map_err(|e| StorageError::Parse(e.to_string()))
    }

    async fn list_folder(&self, path: &str) -> Result<Vec<FileMetadata>, StorageError> {
        let path = normalize_folder_path(path);
        tracing::debug!(%path, "dropbox list_folder");

        let text = self
            .rpc("files/list_folder", &json!({ "path": path, "recursive": false }))
            .await?;
        let mut page = parse_list_folder(&text)?;
        let mut files = std::mem::take(&mut page.files);
        while page.has_more {
            let text = self
                .rpc("files/list_folder/continue", &json!({ "cursor": page.cursor }))
                .await?;
            page = parse_list_folder(&text)?;
            files.append(&mut page.files);
        }
        Ok(files)
    }
}

async fn read_success_text(response: reqwest::Response) -> Result<String, StorageError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| StorageError::Request(e.to_string()))?;
    if status != 200 {
        return Err(StorageError::Api { status, body: text });
    }
    Ok(text)
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Place a downloaded body into the payload field selected by `mode`.
pub(crate) fn raw_download(
    metadata: FileMetadata,
    mode: DownloadMode,
    bytes: Vec<u8>,
    mime_type: String,
) -> Result<RawDownload, StorageError> {
    let mut raw = RawDownload::new(metadata);
    match mode {
        DownloadMode::Binary => raw.file_binary = Some(bytes),
        DownloadMode::Blob => raw.file_blob = Some(BlobPayload { mime_type, bytes }),
        DownloadMode::Text => {
            let text = String::from_utf8(bytes).map_err(|_| DownloadError::NotUtf8 {
                path: raw.metadata.path_display.clone().unwrap_or_else(|| raw.metadata.name.clone()),
            })?;
            raw.content = Some(text);
        }
    }
    Ok(raw)
}

/// One page of a `files/list_folder` response, files only.
#[derive(Debug, Default)]
pub(crate) struct ListFolderPage {
    pub files: Vec<FileMetadata>,
    pub cursor: String,
    pub has_more: bool,
}

pub(crate) fn parse_list_folder(json: &str) -> Result<ListFolderPage, StorageError> {
    #[derive(serde::Deserialize)]
    struct Raw {
        entries: Vec<Value>,
        cursor: String,
        has_more: bool,
    }

    let raw: Raw = serde_json::from_str(json).map_err(|e| StorageError::Parse(e.to_string()))?;
    let mut files = Vec::new();
    for entry in raw.entries {
        if entry.get(".tag").and_then(Value::as_str) != Some("file") {
            continue;
        }
        let file: FileMetadata = serde_json::from_value(entry).map_err(|e| StorageError::Parse(e.to_string()))?;
        files.push(file);
    }
    Ok(ListFolderPage { files, cursor: raw.cursor, has_more: raw.has_more })
}

/// Normalize a folder path: leading `/`, no trailing `/`, root as `""`.
pub(crate) fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

/// Normalize a file path; the root is not a file.
pub(crate) fn normalize_file_path(path: &str) -> Result<String, StorageError> {
    let normalized = normalize_folder_path(path);
    if normalized.is_empty() {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }
    Ok(normalized)
}

/// Serialize JSON for an HTTP header, escaping everything outside printable ASCII.
pub(crate) fn header_safe_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if (' '..='~').contains(&ch) {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in &*ch.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "dropbox_test.rs"]
mod tests;
