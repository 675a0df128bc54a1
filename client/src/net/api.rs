//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics. Error strings
//! prefer the server's `{"error": ...}` message and fall back to the status.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{Book, FileMetadata, NewBook, User};

#[cfg(any(test, feature = "hydrate"))]
fn book_endpoint(book_id: &str) -> String {
    format!("/api/books/{book_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn save_to_dropbox_endpoint(book_id: &str) -> String {
    format!("/api/books/{book_id}/dropbox")
}

#[cfg(any(test, feature = "hydrate"))]
fn export_to_dropbox_endpoint(book_id: &str) -> String {
    format!("/api/books/{book_id}/export/dropbox")
}

/// Download link for a book's EPUB.
#[must_use]
pub fn export_epub_url(book_id: &str) -> String {
    format!("/api/books/{book_id}/export.epub")
}

/// Human-readable failure text for a non-OK response.
#[cfg(any(test, feature = "hydrate"))]
fn failure_message(action: &str, status: u16, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ => format!("{action} failed: {status}"),
    }
}

#[cfg(feature = "hydrate")]
async fn read_failure(action: &str, resp: gloo_net::http::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    failure_message(action, resp.status(), &body)
}

#[cfg(feature = "hydrate")]
async fn read_json<T: serde::de::DeserializeOwned>(action: &str, resp: gloo_net::http::Response) -> Result<T, String> {
    if !resp.ok() {
        return Err(read_failure(action, resp).await);
    }
    resp.json::<T>().await.map_err(|e| e.to_string())
}

/// Fetch the currently authenticated user from `/api/auth/me`.
/// Returns `None` if not authenticated or on the server.
pub async fn fetch_current_user() -> Option<User> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/me")
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<User>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Log out the current user by calling `POST /api/auth/logout`.
pub async fn logout() {
    #[cfg(feature = "hydrate")]
    {
        let _ = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await;
    }
}

/// Create an account via `POST /api/auth/register`. The server signs the new
/// user in and sets the session cookie.
///
/// # Errors
///
/// Returns the server's message (e.g. "email already registered") or a
/// transport error string.
pub async fn register(name: &str, email: &str, password: &str) -> Result<User, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "name": name, "email": email, "password": password });
        let resp = gloo_net::http::Request::post("/api/auth/register")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("register", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (name, email, password);
        Err("not available on server".to_owned())
    }
}

/// Sign in via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns the server's message or a transport error string.
pub async fn login(email: &str, password: &str) -> Result<User, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "password": password });
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("login", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err("not available on server".to_owned())
    }
}

/// List the caller's books.
///
/// # Errors
///
/// Returns an error string on transport failure or a non-OK status.
pub async fn fetch_books() -> Result<Vec<Book>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/books")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("load books", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns the server's validation message or a transport error string.
pub async fn create_book(book: &NewBook) -> Result<Book, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/books")
            .json(book)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("create book", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book;
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns an error string on transport failure or a non-OK status.
pub async fn delete_book(book_id: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::delete(&book_endpoint(book_id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("delete book", resp).await);
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book_id;
        Err("not available on server".to_owned())
    }
}

/// Save a book's JSON snapshot to Dropbox.
///
/// # Errors
///
/// Returns the server's message (e.g. storage not configured) or a
/// transport error string.
pub async fn save_book_to_dropbox(book_id: &str) -> Result<FileMetadata, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(&save_to_dropbox_endpoint(book_id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("save to Dropbox", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book_id;
        Err("not available on server".to_owned())
    }
}

/// Generate an EPUB on the server and store it in Dropbox.
///
/// # Errors
///
/// Returns the server's message or a transport error string.
pub async fn export_book_to_dropbox(book_id: &str) -> Result<FileMetadata, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(&export_to_dropbox_endpoint(book_id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        read_json("export to Dropbox", resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = book_id;
        Err("not available on server".to_owned())
    }
}
