//! Editable book draft backing the create page.
//!
//! Chapter order in the draft is the reading order of the exported book, so
//! every reorder operation is an adjacent swap that keeps the rest in place.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use crate::net::types::{ContentEntry, NewBook};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub language: String,
    pub cover_path: String,
    pub chapters: Vec<ContentEntry>,
}

impl BookDraft {
    /// Draft with one empty chapter, ready for typing.
    #[must_use]
    pub fn new() -> Self {
        let mut draft = Self::default();
        draft.add_chapter();
        draft
    }

    pub fn add_chapter(&mut self) {
        let title = format!("Chapter {}", self.chapters.len() + 1);
        self.chapters.push(ContentEntry::new(title, String::new()));
    }

    pub fn remove_chapter(&mut self, index: usize) {
        if index < self.chapters.len() {
            self.chapters.remove(index);
        }
    }

    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.chapters.len() {
            self.chapters.swap(index - 1, index);
        }
    }

    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.chapters.len() {
            self.chapters.swap(index, index + 1);
        }
    }

    pub fn set_chapter_title(&mut self, index: usize, title: String) {
        if let Some(chapter) = self.chapters.get_mut(index) {
            chapter.title = title;
        }
    }

    pub fn set_chapter_data(&mut self, index: usize, data: String) {
        if let Some(chapter) = self.chapters.get_mut(index) {
            chapter.data = data;
        }
    }

    /// Payload for `POST /api/books`.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when a required field is blank.
    pub fn to_new_book(&self) -> Result<NewBook, String> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() {
            return Err("Give the book a title.".to_owned());
        }
        if author.is_empty() {
            return Err("Add an author.".to_owned());
        }
        if let Some(pos) = self.chapters.iter().position(|c| c.title.trim().is_empty()) {
            return Err(format!("Chapter {} needs a title.", pos + 1));
        }
        Ok(NewBook {
            title: title.to_owned(),
            author: author.to_owned(),
            publisher: optional(&self.publisher),
            language: optional(&self.language),
            cover_path: optional(&self.cover_path),
            chapters: self.chapters.clone(),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
