use std::io::{Cursor, Read};
use std::sync::Arc;

use super::*;
use crate::state::test_helpers::{MockStorage, dummy_book, test_app_state_with_storage};

fn zip_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_owned).collect()
}

// =============================================================================
// export_epub
// =============================================================================

#[tokio::test]
async fn export_epub_without_cover_needs_no_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = crate::state::test_helpers::test_app_state();
    state.export_dir = dir.path().join("exports");

    let exported = export_epub(&state, &dummy_book()).await.unwrap();
    assert_eq!(exported.filename, "tides-stones.epub");
    assert_eq!(exported.chapter_count, 2);

    let mut archive = zip::ZipArchive::new(Cursor::new(exported.bytes.as_slice())).unwrap();
    let mut mimetype = String::new();
    archive.by_index(0).unwrap().read_to_string(&mut mimetype).unwrap();
    assert_eq!(mimetype, "application/epub+zip");
}

#[tokio::test]
async fn export_epub_cleans_up_work_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = crate::state::test_helpers::test_app_state();
    state.export_dir = dir.path().to_path_buf();

    export_epub(&state, &dummy_book()).await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn export_epub_embeds_cover_from_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MockStorage::with_file("/Clustica/covers/tides.png", b"\x89PNG fake"));
    let state = test_app_state_with_storage(storage, dir.path().to_path_buf());
    let mut book = dummy_book();
    book.cover_path = Some("/Clustica/covers/tides.png".into());

    let exported = export_epub(&state, &book).await.unwrap();
    let names = zip_names(&exported.bytes);
    assert!(names.iter().any(|n| n.ends_with("cover.png")), "names: {names:?}");
}

#[tokio::test]
async fn export_epub_with_cover_requires_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = crate::state::test_helpers::test_app_state();
    state.export_dir = dir.path().to_path_buf();
    let mut book = dummy_book();
    book.cover_path = Some("/covers/a.png".into());

    let err = export_epub(&state, &book).await.unwrap_err();
    assert!(matches!(err, ExportError::Storage(StorageError::NotConfigured)));
}

#[tokio::test]
async fn export_epub_rejects_unsupported_cover_type() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MockStorage::with_file("/covers/a.bmp", b"BM"));
    let state = test_app_state_with_storage(storage, dir.path().to_path_buf());
    let mut book = dummy_book();
    book.cover_path = Some("/covers/a.bmp".into());

    let err = export_epub(&state, &book).await.unwrap_err();
    assert!(matches!(err, ExportError::Epub(EpubError::UnsupportedCover(_))));
}

#[tokio::test]
async fn export_epub_reports_missing_cover() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_app_state_with_storage(Arc::new(MockStorage::default()), dir.path().to_path_buf());
    let mut book = dummy_book();
    book.cover_path = Some("/covers/gone.jpg".into());

    match export_epub(&state, &book).await.unwrap_err() {
        ExportError::Storage(err) => assert!(err.is_not_found()),
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// export_to_dropbox
// =============================================================================

#[tokio::test]
async fn export_to_dropbox_uploads_under_exports_folder() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MockStorage::default());
    let state = test_app_state_with_storage(storage.clone(), dir.path().to_path_buf());

    let metadata = export_to_dropbox(&state, &dummy_book()).await.unwrap();
    assert_eq!(metadata.path_display.as_deref(), Some("/Clustica/exports/tides-stones.epub"));

    let uploaded = storage.get("/Clustica/exports/tides-stones.epub").unwrap();
    assert!(zip_names(&uploaded).contains(&"mimetype".to_owned()));
}

#[tokio::test]
async fn export_to_dropbox_requires_storage() {
    let state = crate::state::test_helpers::test_app_state();
    let err = export_to_dropbox(&state, &dummy_book()).await.unwrap_err();
    assert!(matches!(err, ExportError::Storage(StorageError::NotConfigured)));
}
