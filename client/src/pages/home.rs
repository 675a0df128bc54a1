//! Landing page.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    view! {
        <section class="home">
            <h1 class="home__title">"Clustica"</h1>
            <p class="home__tagline">"Write chapters, arrange them, and publish an EPUB in one click."</p>
            <div class="home__actions">
                <Show
                    when=move || auth.get().is_authenticated()
                    fallback=|| {
                        view! {
                            <a href="/register" class="btn btn--primary">"Get started"</a>
                            <a href="/login" class="btn">"Log in"</a>
                        }
                    }
                >
                    <a href="/create" class="btn btn--primary">"Start a new book"</a>
                    <a href="/library" class="btn">"Open my library"</a>
                </Show>
            </div>
        </section>
    }
}
