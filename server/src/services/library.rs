//! Personal library: book CRUD scoped to the owning user.
//!
//! Chapters are stored as one JSONB array so reading order survives a round
//! trip without a join table. Every query filters on `owner_id`; a book owned
//! by someone else is indistinguishable from a missing one.

use books::{Book, ContentEntry, NewBook};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("book not found")]
    NotFound,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

const BOOK_COLUMNS: &str = "id, owner_id, title, author, publisher, language, cover_path, chapters, \
     (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at_ms, \
     (EXTRACT(EPOCH FROM updated_at) * 1000)::BIGINT AS updated_at_ms";

/// Trim a book payload and reject unusable input.
///
/// Blank optional fields collapse to `None`.
///
/// # Errors
///
/// Returns [`LibraryError::Invalid`] for an empty title or author, an
/// over-long title, or a chapter without a title.
pub fn validate_new_book(book: NewBook) -> Result<NewBook, LibraryError> {
    let title = book.title.trim().to_owned();
    let author = book.author.trim().to_owned();
    if title.is_empty() {
        return Err(LibraryError::Invalid("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(LibraryError::Invalid("title is too long"));
    }
    if author.is_empty() {
        return Err(LibraryError::Invalid("author is required"));
    }
    if book.chapters.iter().any(|c| c.title.trim().is_empty()) {
        return Err(LibraryError::Invalid("every chapter needs a title"));
    }
    Ok(NewBook {
        title,
        author,
        publisher: non_blank(book.publisher),
        language: non_blank(book.language),
        cover_path: non_blank(book.cover_path),
        chapters: book.chapters,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_id(raw: &str) -> Result<Uuid, LibraryError> {
    Uuid::parse_str(raw).map_err(|_| LibraryError::NotFound)
}

fn row_to_book(row: &PgRow) -> Book {
    let id: Uuid = row.get("id");
    let owner_id: Uuid = row.get("owner_id");
    let Json(chapters): Json<Vec<ContentEntry>> = row.get("chapters");
    Book {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        title: row.get("title"),
        author: row.get("author"),
        publisher: row.get("publisher"),
        language: row.get("language"),
        cover_path: row.get("cover_path"),
        chapters,
        created_at_ms: row.get("created_at_ms"),
        updated_at_ms: row.get("updated_at_ms"),
    }
}

/// All books owned by `owner`, most recently updated first.
///
/// # Errors
///
/// Returns [`LibraryError::Db`] when the query fails.
pub async fn list_books(pool: &PgPool, owner: Uuid) -> Result<Vec<Book>, LibraryError> {
    let rows = sqlx::query(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE owner_id = $1 ORDER BY updated_at DESC, id"
    ))
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_book).collect())
}

/// Fetch one book.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] for a malformed id, a missing book, or a
/// book owned by someone else.
pub async fn get_book(pool: &PgPool, owner: Uuid, id: &str) -> Result<Book, LibraryError> {
    let id = parse_id(id)?;
    let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 AND owner_id = $2"))
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?
        .ok_or(LibraryError::NotFound)?;
    Ok(row_to_book(&row))
}

/// Validate and insert a new book for `owner`.
///
/// # Errors
///
/// Returns [`LibraryError::Invalid`] for a payload rejected by
/// [`validate_new_book`], or [`LibraryError::Db`] when the insert fails.
pub async fn create_book(pool: &PgPool, owner: Uuid, book: NewBook) -> Result<Book, LibraryError> {
    let book = validate_new_book(book)?;
    let row = sqlx::query(&format!(
        "INSERT INTO books (owner_id, title, author, publisher, language, cover_path, chapters) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {BOOK_COLUMNS}"
    ))
    .bind(owner)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.publisher)
    .bind(&book.language)
    .bind(&book.cover_path)
    .bind(Json(&book.chapters))
    .fetch_one(pool)
    .await?;
    let created = row_to_book(&row);
    tracing::info!(book_id = %created.id, %owner, chapters = created.chapters.len(), "book created");
    Ok(created)
}

/// Replace every editable field of a book.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] for a malformed, missing, or foreign id,
/// [`LibraryError::Invalid`] for a rejected payload, or
/// [`LibraryError::Db`] when the update fails.
pub async fn update_book(pool: &PgPool, owner: Uuid, id: &str, book: NewBook) -> Result<Book, LibraryError> {
    let id = parse_id(id)?;
    let book = validate_new_book(book)?;
    let row = sqlx::query(&format!(
        "UPDATE books SET title = $3, author = $4, publisher = $5, language = $6, cover_path = $7, \
         chapters = $8, updated_at = now() \
         WHERE id = $1 AND owner_id = $2 \
         RETURNING {BOOK_COLUMNS}"
    ))
    .bind(id)
    .bind(owner)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.publisher)
    .bind(&book.language)
    .bind(&book.cover_path)
    .bind(Json(&book.chapters))
    .fetch_optional(pool)
    .await?
    .ok_or(LibraryError::NotFound)?;
    Ok(row_to_book(&row))
}

/// Delete one book.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] when nothing was deleted, or
/// [`LibraryError::Db`] when the query fails.
pub async fn delete_book(pool: &PgPool, owner: Uuid, id: &str) -> Result<(), LibraryError> {
    let id = parse_id(id)?;
    let result = sqlx::query("DELETE FROM books WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(LibraryError::NotFound);
    }
    tracing::info!(book_id = %id, %owner, "book deleted");
    Ok(())
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
