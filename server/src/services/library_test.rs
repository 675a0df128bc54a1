use super::*;

fn draft() -> NewBook {
    NewBook {
        title: "  Tides  ".into(),
        author: " Mara ".into(),
        publisher: Some("   ".into()),
        language: Some(" en ".into()),
        cover_path: None,
        chapters: vec![ContentEntry::new("One", "a"), ContentEntry::new("Two", "b")],
    }
}

// =============================================================================
// validate_new_book
// =============================================================================

#[test]
fn validate_trims_and_collapses_blank_optionals() {
    let book = validate_new_book(draft()).unwrap();
    assert_eq!(book.title, "Tides");
    assert_eq!(book.author, "Mara");
    assert_eq!(book.publisher, None);
    assert_eq!(book.language.as_deref(), Some("en"));
}

#[test]
fn validate_keeps_chapter_order() {
    let book = validate_new_book(draft()).unwrap();
    let titles: Vec<_> = book.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["One", "Two"]);
}

#[test]
fn validate_allows_empty_chapter_list() {
    let book = validate_new_book(NewBook { chapters: Vec::new(), ..draft() }).unwrap();
    assert!(book.chapters.is_empty());
}

#[test]
fn validate_requires_title() {
    let err = validate_new_book(NewBook { title: " ".into(), ..draft() }).unwrap_err();
    assert_eq!(err.to_string(), "title is required");
}

#[test]
fn validate_requires_author() {
    let err = validate_new_book(NewBook { author: String::new(), ..draft() }).unwrap_err();
    assert_eq!(err.to_string(), "author is required");
}

#[test]
fn validate_rejects_long_title() {
    let err = validate_new_book(NewBook { title: "t".repeat(MAX_TITLE_LEN + 1), ..draft() }).unwrap_err();
    assert!(matches!(err, LibraryError::Invalid(_)));
}

#[test]
fn validate_rejects_untitled_chapter() {
    let mut book = draft();
    book.chapters.push(ContentEntry::new("  ", "text"));
    let err = validate_new_book(book).unwrap_err();
    assert_eq!(err.to_string(), "every chapter needs a title");
}

// =============================================================================
// ids
// =============================================================================

#[test]
fn malformed_id_reads_as_not_found() {
    assert!(matches!(parse_id("not-a-uuid"), Err(LibraryError::NotFound)));
    assert!(parse_id("00000000-0000-0000-0000-0000000000b1").is_ok());
}

#[tokio::test]
async fn get_book_with_malformed_id_skips_database() {
    let state = crate::state::test_helpers::test_app_state();
    let err = get_book(&state.pool, Uuid::nil(), "nope").await.unwrap_err();
    assert!(matches!(err, LibraryError::NotFound));
}

#[tokio::test]
async fn create_book_rejects_invalid_payload_before_database() {
    let state = crate::state::test_helpers::test_app_state();
    let err = create_book(&state.pool, Uuid::nil(), NewBook::default()).await.unwrap_err();
    assert!(matches!(err, LibraryError::Invalid(_)));
}
