//! Book export: EPUB bytes for download, or an EPUB pushed to Dropbox.
//!
//! Each export works in its own temporary directory under `export_dir`; the
//! cover (if any) is fetched there before generation and the directory is
//! removed when the export returns.

use std::path::{Path, PathBuf};

use books::{Book, FileMetadata};

use super::dropbox::{self, CloudStorage, DownloadMode, StorageError};
use super::epub::{self, EpubError, EpubGenerator};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Epub(#[from] EpubError),
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated EPUB held in memory.
#[derive(Debug, Clone)]
pub struct ExportedEpub {
    /// Download file name, e.g. `tides-stones.epub`.
    pub filename: String,
    pub bytes: Vec<u8>,
    pub chapter_count: usize,
}

/// Generate an EPUB for `book`.
///
/// # Errors
///
/// Fails if the book has a cover but storage is not configured, the cover
/// cannot be fetched or has an unsupported type, or generation fails.
pub async fn export_epub(state: &AppState, book: &Book) -> Result<ExportedEpub, ExportError> {
    tokio::fs::create_dir_all(&state.export_dir).await?;
    let workdir = tempfile::Builder::new().prefix("epub-").tempdir_in(&state.export_dir)?;

    let mut options = book.to_ebook_options();
    if let Some(cover_path) = book.cover_path.as_deref() {
        let local = fetch_cover(state.storage()?, cover_path, workdir.path()).await?;
        options.cover = Some(local.to_string_lossy().into_owned());
    }

    let filename = format!("{}.epub", book.file_stem());
    let artifact = EpubGenerator::new(options, workdir.path().join(&filename))?.generate().await?;
    let bytes = tokio::fs::read(&artifact.path).await?;
    tracing::info!(
        book_id = %book.id,
        identifier = %artifact.identifier,
        size = artifact.size,
        "book exported"
    );

    Ok(ExportedEpub { filename, bytes, chapter_count: artifact.chapter_count })
}

/// Generate an EPUB and upload it under the app's exports folder.
///
/// # Errors
///
/// Fails with [`StorageError::NotConfigured`] when no storage backend is set,
/// with any [`export_epub`] error, or when the upload is rejected.
pub async fn export_to_dropbox(state: &AppState, book: &Book) -> Result<FileMetadata, ExportError> {
    let storage = state.storage()?;
    let exported = export_epub(state, book).await?;
    let path = dropbox::export_path(&book.file_stem());
    let metadata = storage.upload(&path, exported.bytes).await?;
    tracing::info!(book_id = %book.id, path = %path, "export uploaded");
    Ok(metadata)
}

async fn fetch_cover(storage: &dyn CloudStorage, remote: &str, workdir: &Path) -> Result<PathBuf, ExportError> {
    let (ext, _) = epub::cover_media_type(remote)?;
    let file = dropbox::fetch(storage, remote, DownloadMode::Binary).await?;
    let local = workdir.join(format!("cover.{ext}"));
    tokio::fs::write(&local, file.content.as_bytes()).await?;
    Ok(local)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
