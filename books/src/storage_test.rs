use super::*;

fn metadata() -> FileMetadata {
    FileMetadata {
        id: "id:abc".to_owned(),
        name: "Draft.json".to_owned(),
        path_lower: Some("/clustica/books/draft.json".to_owned()),
        path_display: Some("/Clustica/books/Draft.json".to_owned()),
        rev: "015f".to_owned(),
        size: 5,
        client_modified: "2024-01-01T00:00:00Z".to_owned(),
        server_modified: "2024-01-01T00:00:01Z".to_owned(),
        content_hash: None,
    }
}

// =============================================================
// normalize
// =============================================================

#[test]
fn normalize_without_payload_fails() {
    let err = RawDownload::new(metadata()).normalize().unwrap_err();
    assert_eq!(err, DownloadError::NoPayload { path: "/Clustica/books/Draft.json".to_owned() });
}

#[test]
fn normalize_text_only() {
    let mut raw = RawDownload::new(metadata());
    raw.content = Some("hello".to_owned());
    let file = raw.normalize().unwrap();
    assert_eq!(file.content, FileContent::Text("hello".to_owned()));
}

#[test]
fn normalize_blob_only_keeps_mime_type() {
    let mut raw = RawDownload::new(metadata());
    raw.file_blob = Some(BlobPayload { mime_type: "image/png".to_owned(), bytes: vec![1, 2] });
    let file = raw.normalize().unwrap();
    assert_eq!(file.content.mime_type(), Some("image/png"));
    assert_eq!(file.content.as_bytes(), &[1, 2]);
}

#[test]
fn normalize_prefers_binary_over_blob_and_text() {
    let mut raw = RawDownload::new(metadata());
    raw.file_binary = Some(b"bin".to_vec());
    raw.file_blob = Some(BlobPayload { mime_type: "text/plain".to_owned(), bytes: b"blob".to_vec() });
    raw.content = Some("text".to_owned());
    let file = raw.normalize().unwrap();
    assert_eq!(file.content, FileContent::Binary(b"bin".to_vec()));
}

#[test]
fn normalize_prefers_blob_over_text() {
    let mut raw = RawDownload::new(metadata());
    raw.file_blob = Some(BlobPayload { mime_type: "text/plain".to_owned(), bytes: b"blob".to_vec() });
    raw.content = Some("text".to_owned());
    assert!(matches!(raw.normalize().unwrap().content, FileContent::Blob(_)));
}

// =============================================================
// into_text / display_path
// =============================================================

#[test]
fn into_text_decodes_utf8_bytes() {
    let file = DownloadedFile { metadata: metadata(), content: FileContent::Binary("héllo".as_bytes().to_vec()) };
    assert_eq!(file.into_text().unwrap(), "héllo");
}

#[test]
fn into_text_rejects_invalid_utf8() {
    let file = DownloadedFile { metadata: metadata(), content: FileContent::Binary(vec![0xff, 0xfe]) };
    assert!(matches!(file.into_text(), Err(DownloadError::NotUtf8 { .. })));
}

#[test]
fn display_path_falls_back_to_lower_then_name() {
    let mut meta = metadata();
    meta.path_display = None;
    let file = DownloadedFile { metadata: meta.clone(), content: FileContent::Text(String::new()) };
    assert_eq!(file.display_path(), "/clustica/books/draft.json");

    meta.path_lower = None;
    let file = DownloadedFile { metadata: meta, content: FileContent::Text(String::new()) };
    assert_eq!(file.display_path(), "Draft.json");
}

#[test]
fn metadata_parses_dropbox_json_and_ignores_unknown_fields() {
    let json = r#"{
        ".tag": "file",
        "name": "a.epub",
        "id": "id:1",
        "client_modified": "2024-05-01T10:00:00Z",
        "server_modified": "2024-05-01T10:00:02Z",
        "rev": "a1",
        "size": 2048,
        "path_lower": "/clustica/exports/a.epub",
        "path_display": "/Clustica/exports/a.epub",
        "is_downloadable": true,
        "content_hash": "e3b0"
    }"#;
    let meta: FileMetadata = serde_json::from_str(json).unwrap();
    assert_eq!(meta.size, 2048);
    assert_eq!(meta.content_hash.as_deref(), Some("e3b0"));
}
