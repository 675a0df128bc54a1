//! Wire types shared with the server.

pub use books::{Book, ContentEntry, FileMetadata, NewBook, User};
