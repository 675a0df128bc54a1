//! Shared book, identity, and storage models for Clustica.
//!
//! This crate owns the JSON representation used by both `server` and `client`.
//! It also holds the local adapter types that stand in for the loosely typed
//! payloads of the Dropbox download API and the EPUB generator options.

pub mod book;
pub mod ebook;
pub mod storage;
pub mod user;

pub use book::{Book, NewBook};
pub use ebook::{ContentEntry, EbookOptions, EbookOptionsError};
pub use storage::{BlobPayload, DownloadError, DownloadedFile, FileContent, FileMetadata, RawDownload};
pub use user::User;
