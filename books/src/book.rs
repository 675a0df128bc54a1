//! Books in a user's personal library.

#[cfg(test)]
#[path = "book_test.rs"]
mod book_test;

use serde::{Deserialize, Serialize};

use crate::ebook::{ContentEntry, EbookOptions};

/// A persisted book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book identifier (UUID string).
    pub id: String,
    /// Owning user (UUID string).
    pub owner_id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: Option<String>,
    /// BCP 47 language tag.
    #[serde(default)]
    pub language: Option<String>,
    /// Dropbox path of the cover image, if any.
    #[serde(default)]
    pub cover_path: Option<String>,
    /// Chapters in reading order.
    pub chapters: Vec<ContentEntry>,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at_ms: i64,
    /// Last update time in milliseconds since the Unix epoch.
    pub updated_at_ms: i64,
}

/// Create/update payload for a book.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub cover_path: Option<String>,
    #[serde(default)]
    pub chapters: Vec<ContentEntry>,
}

impl Book {
    /// Generator options for this book, chapters in stored order.
    ///
    /// The cover is left unset: `cover_path` names a remote file that must be
    /// fetched to local disk before generation.
    #[must_use]
    pub fn to_ebook_options(&self) -> EbookOptions {
        let mut options = EbookOptions::new(self.title.clone(), self.author.clone(), self.chapters.clone());
        options.publisher = self.publisher.clone();
        options.lang = self.language.clone();
        options
    }

    /// Filesystem-safe base name derived from the title.
    #[must_use]
    pub fn file_stem(&self) -> String {
        slugify(&self.title)
    }

    /// Editable copy of this book's fields.
    #[must_use]
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            language: self.language.clone(),
            cover_path: self.cover_path.clone(),
            chapters: self.chapters.clone(),
        }
    }
}

/// Lowercase ASCII slug: alphanumerics kept, every other run becomes one `-`.
/// Falls back to `"untitled"` when nothing survives.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() { "untitled".to_owned() } else { slug }
}
