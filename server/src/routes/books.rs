//! Library routes: CRUD over the caller's books.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use books::NewBook;

use super::auth::AuthUser;
use super::error_response;
use crate::services::library::{self, LibraryError};
use crate::state::AppState;

pub(crate) fn library_error_status(err: &LibraryError) -> StatusCode {
    match err {
        LibraryError::NotFound => StatusCode::NOT_FOUND,
        LibraryError::Invalid(_) => StatusCode::BAD_REQUEST,
        LibraryError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn library_error_response(err: &LibraryError) -> Response {
    let status = library_error_status(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "library operation failed");
        return error_response(status, "internal error");
    }
    error_response(status, err.to_string())
}

/// `GET /api/books`
pub async fn list_books(State(state): State<AppState>, auth: AuthUser) -> Response {
    match library::list_books(&state.pool, auth.id()).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => library_error_response(&e),
    }
}

/// `POST /api/books`
pub async fn create_book(State(state): State<AppState>, auth: AuthUser, Json(body): Json<NewBook>) -> Response {
    match library::create_book(&state.pool, auth.id(), body).await {
        Ok(book) => (StatusCode::CREATED, Json(book)).into_response(),
        Err(e) => library_error_response(&e),
    }
}

/// `GET /api/books/{id}`
pub async fn get_book(State(state): State<AppState>, auth: AuthUser, Path(id): Path<String>) -> Response {
    match library::get_book(&state.pool, auth.id(), &id).await {
        Ok(book) => Json(book).into_response(),
        Err(e) => library_error_response(&e),
    }
}

/// `PUT /api/books/{id}`
pub async fn update_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<NewBook>,
) -> Response {
    match library::update_book(&state.pool, auth.id(), &id, body).await {
        Ok(book) => Json(book).into_response(),
        Err(e) => library_error_response(&e),
    }
}

/// `DELETE /api/books/{id}`
pub async fn delete_book(State(state): State<AppState>, auth: AuthUser, Path(id): Path<String>) -> Response {
    match library::delete_book(&state.pool, auth.id(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => library_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_map_to_statuses() {
        assert_eq!(library_error_status(&LibraryError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(library_error_status(&LibraryError::Invalid("title is required")), StatusCode::BAD_REQUEST);
        assert_eq!(
            library_error_status(&LibraryError::Db(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
