use books::{ContentEntry, DownloadError};

use super::*;

// =============================================================================
// storage_error_status
// =============================================================================

#[test]
fn not_configured_is_service_unavailable() {
    assert_eq!(storage_error_status(&StorageError::NotConfigured), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn invalid_path_is_bad_request() {
    assert_eq!(storage_error_status(&StorageError::InvalidPath(String::new())), StatusCode::BAD_REQUEST);
}

#[test]
fn missing_file_is_not_found() {
    let err = StorageError::Api { status: 409, body: r#"{"error_summary":"path/not_found/.."}"#.into() };
    assert_eq!(storage_error_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn upstream_failures_are_bad_gateway() {
    for err in [
        StorageError::Api { status: 500, body: "oops".into() },
        StorageError::Request("timeout".into()),
        StorageError::Parse("bad json".into()),
        StorageError::Download(DownloadError::NoPayload { path: "/a".into() }),
    ] {
        assert_eq!(storage_error_status(&err), StatusCode::BAD_GATEWAY, "{err}");
    }
}

// =============================================================================
// parse_snapshot
// =============================================================================

#[test]
fn parse_snapshot_reads_saved_book_json() {
    let saved = NewBook {
        title: "Tides".into(),
        author: "Mara".into(),
        chapters: vec![ContentEntry::new("One", "a")],
        ..NewBook::default()
    };
    let text = serde_json::to_string_pretty(&saved).unwrap();
    assert_eq!(parse_snapshot(&text).unwrap(), saved);
}

#[test]
fn parse_snapshot_rejects_other_json() {
    let err = parse_snapshot(r#"{"hello":"world"}"#).unwrap_err();
    assert!(err.starts_with("not a book snapshot"));
}
