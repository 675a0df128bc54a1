//! The signed-in user's book list.

#[cfg(test)]
#[path = "library_test.rs"]
mod library_test;

use crate::net::types::Book;

#[derive(Clone, Debug, Default)]
pub struct LibraryState {
    /// Most recently updated first.
    pub books: Vec<Book>,
    pub loading: bool,
    /// Last user-visible status line (saved, exported, failed...).
    pub message: Option<String>,
}

impl LibraryState {
    pub fn set_books(&mut self, mut books: Vec<Book>) {
        sort_recent_first(&mut books);
        self.books = books;
        self.loading = false;
    }

    /// Insert or replace a book, keeping recency order.
    pub fn upsert(&mut self, book: Book) {
        self.books.retain(|b| b.id != book.id);
        self.books.push(book);
        sort_recent_first(&mut self.books);
    }

    pub fn remove(&mut self, id: &str) {
        self.books.retain(|b| b.id != id);
    }
}

fn sort_recent_first(books: &mut [Book]) {
    books.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms).then_with(|| a.id.cmp(&b.id)));
}
