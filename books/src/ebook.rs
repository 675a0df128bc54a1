//! E-book generation options.
//!
//! DESIGN
//! ======
//! `EbookOptions` is the complete contract accepted by the server's EPUB
//! generator: required title/author/content, a handful of well-known optional
//! fields, and an open-ended `extra` map for generator switches that have no
//! dedicated field. Unknown JSON keys land in `extra` instead of failing the
//! parse, so older clients keep working when new switches appear.

#[cfg(test)]
#[path = "ebook_test.rs"]
mod ebook_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chapter or section of a book. Order within a list is significant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Heading shown in the table of contents.
    pub title: String,
    /// Chapter body (Markdown; raw HTML is shown as text).
    pub data: String,
}

impl ContentEntry {
    #[must_use]
    pub fn new(title: impl Into<String>, data: impl Into<String>) -> Self {
        Self { title: title.into(), data: data.into() }
    }
}

/// Reasons an options record cannot be turned into a book.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EbookOptionsError {
    #[error("e-book title is required")]
    MissingTitle,
    #[error("e-book author is required")]
    MissingAuthor,
    #[error("e-book needs at least one content entry")]
    EmptyContent,
    #[error("content entry {index} has no title")]
    UntitledEntry { index: usize },
}

/// Options for generating an e-book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EbookOptions {
    pub title: String,
    pub author: String,
    /// Chapters in reading order.
    pub content: Vec<ContentEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Filesystem path of the cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// BCP 47 language tag, e.g. `"en"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Heading of the generated table of contents.
    #[serde(default, alias = "tocTitle", skip_serializing_if = "Option::is_none")]
    pub toc_title: Option<String>,
    /// Additional named generator switches (`css`, `appendChapterTitles`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EbookOptions {
    /// Build options from the three required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, content: Vec<ContentEntry>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content,
            publisher: None,
            cover: None,
            lang: None,
            toc_title: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn with_toc_title(mut self, toc_title: impl Into<String>) -> Self {
        self.toc_title = Some(toc_title.into());
        self
    }

    /// Set an additional named option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated requirement: blank title, blank author,
    /// empty content, or a content entry with a blank title.
    pub fn validate(&self) -> Result<(), EbookOptionsError> {
        if self.title.trim().is_empty() {
            return Err(EbookOptionsError::MissingTitle);
        }
        if self.author.trim().is_empty() {
            return Err(EbookOptionsError::MissingAuthor);
        }
        if self.content.is_empty() {
            return Err(EbookOptionsError::EmptyContent);
        }
        if let Some(index) = self.content.iter().position(|entry| entry.title.trim().is_empty()) {
            return Err(EbookOptionsError::UntitledEntry { index });
        }
        Ok(())
    }

    /// Boolean-valued extra option, if set to a JSON boolean.
    #[must_use]
    pub fn extra_bool(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }

    /// String-valued extra option, if set to a JSON string.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}
