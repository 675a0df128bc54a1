//! Dropbox routes: save a book snapshot, browse files, import a snapshot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use books::NewBook;
use serde::Deserialize;

use super::auth::AuthUser;
use super::books::library_error_response;
use super::error_response;
use crate::services::dropbox::{self, DownloadMode, StorageError};
use crate::services::library;
use crate::state::AppState;

pub(crate) fn storage_error_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        StorageError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn storage_error_response(err: &StorageError) -> Response {
    let status = storage_error_status(err);
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!(error = %err, "dropbox request failed");
    }
    error_response(status, err.to_string())
}

/// `POST /api/books/{id}/dropbox`: upload the book as JSON.
pub async fn save_book(State(state): State<AppState>, auth: AuthUser, Path(id): Path<String>) -> Response {
    let storage = match state.storage() {
        Ok(s) => s,
        Err(e) => return storage_error_response(&e),
    };
    let book = match library::get_book(&state.pool, auth.id(), &id).await {
        Ok(b) => b,
        Err(e) => return library_error_response(&e),
    };
    let bytes = match serde_json::to_vec_pretty(&book.to_new_book()) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, book_id = %book.id, "book serialization failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };
    match storage.upload(&dropbox::book_json_path(&book.id), bytes).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => storage_error_response(&e),
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    path: Option<String>,
}

/// `GET /api/dropbox/files?path=`: files directly inside a folder.
/// Defaults to the app root folder.
pub async fn list_files(State(state): State<AppState>, _auth: AuthUser, Query(query): Query<ListQuery>) -> Response {
    let storage = match state.storage() {
        Ok(s) => s,
        Err(e) => return storage_error_response(&e),
    };
    let path = query.path.unwrap_or_else(|| dropbox::APP_ROOT.to_owned());
    match storage.list_folder(&path).await {
        Ok(files) => Json(files).into_response(),
        Err(e) => storage_error_response(&e),
    }
}

#[derive(Deserialize)]
pub struct ImportBody {
    path: String,
}

/// `POST /api/dropbox/import`: download a book JSON snapshot and add it to
/// the caller's library as a new book.
pub async fn import_book(State(state): State<AppState>, auth: AuthUser, Json(body): Json<ImportBody>) -> Response {
    let storage = match state.storage() {
        Ok(s) => s,
        Err(e) => return storage_error_response(&e),
    };
    let text = match dropbox::fetch(storage, &body.path, DownloadMode::Text).await {
        Ok(file) => file.into_text(),
        Err(e) => return storage_error_response(&e),
    };
    let new_book = match text.map_err(|e| e.to_string()).and_then(|t| parse_snapshot(&t)) {
        Ok(b) => b,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    match library::create_book(&state.pool, auth.id(), new_book).await {
        Ok(book) => {
            tracing::info!(book_id = %book.id, path = %body.path, "book imported");
            (StatusCode::CREATED, Json(book)).into_response()
        }
        Err(e) => library_error_response(&e),
    }
}

pub(crate) fn parse_snapshot(text: &str) -> Result<NewBook, String> {
    serde_json::from_str(text).map_err(|e| format!("not a book snapshot: {e}"))
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
