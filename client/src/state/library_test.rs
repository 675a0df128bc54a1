use super::*;

fn book(id: &str, updated_at_ms: i64) -> Book {
    Book {
        id: id.to_owned(),
        owner_id: "u1".to_owned(),
        title: format!("Book {id}"),
        author: "Ada".to_owned(),
        publisher: None,
        language: None,
        cover_path: None,
        chapters: Vec::new(),
        created_at_ms: 0,
        updated_at_ms,
    }
}

fn ids(state: &LibraryState) -> Vec<&str> {
    state.books.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn set_books_sorts_recent_first_and_clears_loading() {
    let mut state = LibraryState { loading: true, ..LibraryState::default() };
    state.set_books(vec![book("a", 1), book("b", 3), book("c", 2)]);
    assert_eq!(ids(&state), ["b", "c", "a"]);
    assert!(!state.loading);
}

#[test]
fn upsert_replaces_existing_book() {
    let mut state = LibraryState::default();
    state.set_books(vec![book("a", 1), book("b", 2)]);
    state.upsert(book("a", 5));
    assert_eq!(ids(&state), ["a", "b"]);
    assert_eq!(state.books.len(), 2);
}

#[test]
fn upsert_adds_new_book() {
    let mut state = LibraryState::default();
    state.upsert(book("a", 1));
    state.upsert(book("b", 2));
    assert_eq!(ids(&state), ["b", "a"]);
}

#[test]
fn remove_drops_only_the_named_book() {
    let mut state = LibraryState::default();
    state.set_books(vec![book("a", 1), book("b", 2)]);
    state.remove("b");
    assert_eq!(ids(&state), ["a"]);
    state.remove("missing");
    assert_eq!(ids(&state), ["a"]);
}
