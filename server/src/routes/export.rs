//! Export routes: EPUB download and EPUB-to-Dropbox.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};

use super::auth::AuthUser;
use super::books::library_error_response;
use super::error_response;
use super::storage::{storage_error_response, storage_error_status};
use crate::services::epub::{EPUB_MIME_TYPE, EpubError};
use crate::services::export::{self, ExportError, ExportedEpub};
use crate::services::library;
use crate::state::AppState;

pub(crate) fn export_error_status(err: &ExportError) -> StatusCode {
    match err {
        ExportError::Storage(e) => storage_error_status(e),
        ExportError::Epub(EpubError::InvalidOptions(_) | EpubError::UnsupportedCover(_)) => StatusCode::BAD_REQUEST,
        ExportError::Epub(_) | ExportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn export_error_response(err: &ExportError) -> Response {
    if let ExportError::Storage(e) = err {
        return storage_error_response(e);
    }
    let status = export_error_status(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "export failed");
        return error_response(status, "export failed");
    }
    error_response(status, err.to_string())
}

pub(crate) fn epub_response(exported: ExportedEpub) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", exported.filename);
    (
        [(header::CONTENT_TYPE, EPUB_MIME_TYPE.to_owned()), (header::CONTENT_DISPOSITION, disposition)],
        exported.bytes,
    )
        .into_response()
}

/// `GET /api/books/{id}/export.epub`
pub async fn download_epub(State(state): State<AppState>, auth: AuthUser, Path(id): Path<String>) -> Response {
    let book = match library::get_book(&state.pool, auth.id(), &id).await {
        Ok(b) => b,
        Err(e) => return library_error_response(&e),
    };
    match export::export_epub(&state, &book).await {
        Ok(exported) => {
            tracing::info!(book_id = %book.id, chapters = exported.chapter_count, "epub download");
            epub_response(exported)
        }
        Err(e) => export_error_response(&e),
    }
}

/// `POST /api/books/{id}/export/dropbox`
pub async fn export_to_dropbox(State(state): State<AppState>, auth: AuthUser, Path(id): Path<String>) -> Response {
    let book = match library::get_book(&state.pool, auth.id(), &id).await {
        Ok(b) => b,
        Err(e) => return library_error_response(&e),
    };
    match export::export_to_dropbox(&state, &book).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => export_error_response(&e),
    }
}
