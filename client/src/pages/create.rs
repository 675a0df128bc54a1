//! Book editor: metadata, ordered chapters, save to the library.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::ContentEntry;
use crate::state::auth::AuthState;
use crate::state::draft::BookDraft;
#[cfg(feature = "hydrate")]
use crate::state::library::LibraryState;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn CreatePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    #[cfg(feature = "hydrate")]
    let library = expect_context::<RwSignal<LibraryState>>();
    let navigate = use_navigate();
    install_unauth_redirect(auth.into(), navigate.clone());

    let draft = RwSignal::new(BookDraft::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let saved = RwSignal::new(false);
    let chapter_count = Memo::new(move |_| draft.with(|d| d.chapters.len()));

    Effect::new(move || {
        if saved.get() {
            navigate("/library", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let new_book = match draft.with(BookDraft::to_new_book) {
            Ok(book) => book,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        busy.set(true);
        info.set("Saving...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_book(&new_book).await {
                Ok(book) => {
                    library.update(|l| l.upsert(book));
                    saved.set(true);
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (new_book, saved);
    };

    view! {
        <section class="editor">
            <h1>"New book"</h1>
            <form class="editor__form" on:submit=on_submit>
                {text_field(draft, "Title", |d| &d.title, |d, v| d.title = v)}
                {text_field(draft, "Author", |d| &d.author, |d, v| d.author = v)}
                {text_field(draft, "Publisher", |d| &d.publisher, |d, v| d.publisher = v)}
                {text_field(draft, "Language", |d| &d.language, |d, v| d.language = v)}
                {text_field(draft, "Cover (Dropbox path)", |d| &d.cover_path, |d, v| d.cover_path = v)}

                <h2>"Chapters"</h2>
                <ol class="editor__chapters">
                    {move || (0..chapter_count.get()).map(|index| view! { <ChapterEditor draft=draft index=index/> }).collect_view()}
                </ol>
                <button type="button" class="btn" on:click=move |_| draft.update(BookDraft::add_chapter)>
                    "Add chapter"
                </button>

                <div class="editor__actions">
                    <button type="submit" class="btn btn--primary" disabled=move || busy.get()>
                        "Save to library"
                    </button>
                </div>
                <Show when=move || !info.get().is_empty()>
                    <p class="editor__message">{move || info.get()}</p>
                </Show>
            </form>
        </section>
    }
}

fn text_field(
    draft: RwSignal<BookDraft>,
    label: &'static str,
    get: fn(&BookDraft) -> &String,
    set: fn(&mut BookDraft, String),
) -> impl IntoView {
    view! {
        <label class="editor__field">
            <span>{label}</span>
            <input
                type="text"
                prop:value=move || draft.with(|d| get(d).clone())
                on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
            />
        </label>
    }
}

fn chapter_field(draft: RwSignal<BookDraft>, index: usize, pick: fn(&ContentEntry) -> &String) -> String {
    draft.with(|d| d.chapters.get(index).map(|c| pick(c).clone()).unwrap_or_default())
}

#[component]
fn ChapterEditor(draft: RwSignal<BookDraft>, index: usize) -> impl IntoView {
    view! {
        <li class="chapter">
            <div class="chapter__head">
                <input
                    class="chapter__title"
                    type="text"
                    placeholder="Chapter title"
                    prop:value=move || chapter_field(draft, index, |c| &c.title)
                    on:input=move |ev| draft.update(|d| d.set_chapter_title(index, event_target_value(&ev)))
                />
                <button type="button" class="btn" title="Move up" on:click=move |_| draft.update(|d| d.move_up(index))>
                    "↑"
                </button>
                <button type="button" class="btn" title="Move down" on:click=move |_| draft.update(|d| d.move_down(index))>
                    "↓"
                </button>
                <button
                    type="button"
                    class="btn btn--danger"
                    title="Remove chapter"
                    on:click=move |_| draft.update(|d| d.remove_chapter(index))
                >
                    "✕"
                </button>
            </div>
            <textarea
                class="chapter__body"
                rows="10"
                placeholder="Write in Markdown..."
                prop:value=move || chapter_field(draft, index, |c| &c.data)
                on:input=move |ev| draft.update(|d| d.set_chapter_data(index, event_target_value(&ev)))
            ></textarea>
        </li>
    }
}
