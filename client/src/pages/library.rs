//! Personal library: the signed-in user's books with export actions.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::api;
use crate::net::types::Book;
use crate::state::auth::AuthState;
use crate::state::library::LibraryState;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn LibraryPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let library = expect_context::<RwSignal<LibraryState>>();
    install_unauth_redirect(auth.into(), use_navigate());

    // Reload whenever the signed-in user changes.
    let user_id = Memo::new(move |_| auth.with(|a| a.user.as_ref().map(|u| u.id.clone())));
    Effect::new(move || {
        if user_id.get().is_none() {
            return;
        }
        library.update(|l| l.loading = true);
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match api::fetch_books().await {
                Ok(books) => library.update(|l| l.set_books(books)),
                Err(e) => {
                    log::warn!("library load failed: {e}");
                    library.update(|l| {
                        l.loading = false;
                        l.message = Some(e);
                    });
                }
            }
        });
    });

    view! {
        <section class="library">
            <div class="library__head">
                <h1>"My Library"</h1>
                <a href="/create" class="btn btn--primary">"New book"</a>
            </div>
            <Show when=move || library.with(|l| l.message.is_some())>
                <p class="library__message">{move || library.with(|l| l.message.clone().unwrap_or_default())}</p>
            </Show>
            <Show
                when=move || !library.with(|l| l.books.is_empty())
                fallback=move || {
                    view! {
                        <p class="library__empty">
                            {move || if library.with(|l| l.loading) { "Loading..." } else { "No books yet." }}
                        </p>
                    }
                }
            >
                <ul class="library__list">
                    {move || {
                        library
                            .with(|l| l.books.clone())
                            .into_iter()
                            .map(|book| view! { <BookRow book=book library=library/> })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </section>
    }
}

#[derive(Clone, Copy)]
enum RowAction {
    Save,
    Export,
    Delete,
}

fn chapter_label(count: usize) -> String {
    if count == 1 { "1 chapter".to_owned() } else { format!("{count} chapters") }
}

#[component]
fn BookRow(book: Book, library: RwSignal<LibraryState>) -> impl IntoView {
    let epub_href = api::export_epub_url(&book.id);
    let id = StoredValue::new(book.id.clone());
    let busy = RwSignal::new(false);

    let run = move |action: RowAction| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let book_id = id.get_value();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let message = match action {
                RowAction::Save => api::save_book_to_dropbox(&book_id)
                    .await
                    .map(|m| format!("Saved to Dropbox: {}", m.path_display.unwrap_or(m.name))),
                RowAction::Export => api::export_book_to_dropbox(&book_id)
                    .await
                    .map(|m| format!("EPUB stored in Dropbox: {}", m.path_display.unwrap_or(m.name))),
                RowAction::Delete => api::delete_book(&book_id).await.map(|()| {
                    library.update(|l| l.remove(&book_id));
                    "Book deleted.".to_owned()
                }),
            };
            library.update(|l| l.message = Some(message.unwrap_or_else(|e| e)));
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (action, book_id, library);
    };

    view! {
        <li class="book-row">
            <div class="book-row__meta">
                <span class="book-row__title">{book.title}</span>
                <span class="book-row__author">{book.author}</span>
                <span class="book-row__chapters">{chapter_label(book.chapters.len())}</span>
            </div>
            <div class="book-row__actions">
                <a class="btn" href=epub_href rel="external" download="">"Download EPUB"</a>
                <button class="btn" disabled=move || busy.get() on:click=move |_| run(RowAction::Save)>
                    "Save to Dropbox"
                </button>
                <button class="btn" disabled=move || busy.get() on:click=move |_| run(RowAction::Export)>
                    "EPUB to Dropbox"
                </button>
                <button class="btn btn--danger" disabled=move || busy.get() on:click=move |_| run(RowAction::Delete)>
                    "Delete"
                </button>
            </div>
        </li>
    }
}
