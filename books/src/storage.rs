//! Cloud-storage file metadata and downloaded-content adapter.
//!
//! DESIGN
//! ======
//! Dropbox download calls hand back the upstream file metadata plus whichever
//! payload representation the call mode produced: raw bytes, a typed blob, or
//! decoded text. `RawDownload` mirrors that loose shape with three optional
//! fields. Callers immediately normalize it into `DownloadedFile`, which holds
//! exactly one `FileContent` variant, and work only with that afterwards.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use serde::{Deserialize, Serialize};

/// Upstream metadata for a stored file (Dropbox `FileMetadata`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Stable file identifier (`id:...`).
    pub id: String,
    /// Last path component, original casing.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,
    /// Revision identifier.
    pub rev: String,
    /// File size in bytes.
    pub size: u64,
    /// Client-reported modification time (ISO 8601).
    pub client_modified: String,
    /// Server modification time (ISO 8601).
    pub server_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Bytes tagged with their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobPayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A download result as produced by the storage client, before normalization.
///
/// Any combination of the payload fields may be populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDownload {
    pub metadata: FileMetadata,
    pub file_binary: Option<Vec<u8>>,
    pub file_blob: Option<BlobPayload>,
    pub content: Option<String>,
}

/// Errors raised while adapting a raw download.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("download of {path} carried no content")]
    NoPayload { path: String },
    #[error("content of {path} is not valid UTF-8")]
    NotUtf8 { path: String },
}

/// The single content representation of a downloaded file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    Binary(Vec<u8>),
    Blob(BlobPayload),
    Text(String),
}

impl FileContent {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Blob(blob) => &blob.bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Blob(blob) => blob.bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }

    /// MIME type, when the representation carries one.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Blob(blob) => Some(&blob.mime_type),
            Self::Binary(_) | Self::Text(_) => None,
        }
    }
}

/// A downloaded file with normalized content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadedFile {
    pub metadata: FileMetadata,
    pub content: FileContent,
}

impl DownloadedFile {
    /// Best available display path for messages and logs.
    #[must_use]
    pub fn display_path(&self) -> &str {
        display_path(&self.metadata)
    }

    /// Decode the content as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NotUtf8`] if binary content is not valid UTF-8.
    pub fn into_text(self) -> Result<String, DownloadError> {
        let path = self.display_path().to_owned();
        match self.content {
            FileContent::Text(text) => Ok(text),
            other => String::from_utf8(other.into_bytes()).map_err(|_| DownloadError::NotUtf8 { path }),
        }
    }
}

impl RawDownload {
    /// Metadata-only result; payload fields are filled in by the caller.
    #[must_use]
    pub fn new(metadata: FileMetadata) -> Self {
        Self { metadata, file_binary: None, file_blob: None, content: None }
    }

    /// Collapse the optional payload fields into one representation.
    ///
    /// When several are populated, bytes win over the blob, and the blob wins
    /// over text.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NoPayload`] if none of the fields is set.
    pub fn normalize(self) -> Result<DownloadedFile, DownloadError> {
        let content = if let Some(bytes) = self.file_binary {
            FileContent::Binary(bytes)
        } else if let Some(blob) = self.file_blob {
            FileContent::Blob(blob)
        } else if let Some(text) = self.content {
            FileContent::Text(text)
        } else {
            return Err(DownloadError::NoPayload { path: display_path(&self.metadata).to_owned() });
        };
        Ok(DownloadedFile { metadata: self.metadata, content })
    }
}

fn display_path(metadata: &FileMetadata) -> &str {
    metadata
        .path_display
        .as_deref()
        .or(metadata.path_lower.as_deref())
        .unwrap_or(&metadata.name)
}
