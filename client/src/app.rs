//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::header::Header;
use crate::pages::{
    create::CreatePage, home::HomePage, library::LibraryPage, login::LoginPage, register::RegisterPage,
};
use crate::state::{auth::AuthState, library::LibraryState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the session signal: it starts in the loading state, is settled by one
/// `/api/auth/me` probe in the browser, and is then written only by the auth
/// forms and the user menu.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::pending());
    let library = RwSignal::new(LibraryState::default());
    provide_context(auth);
    provide_context(library);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let user = crate::net::api::fetch_current_user().await;
        auth.set(AuthState { user, loading: false });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/clustica.css"/>
        <Title text="Clustica - Magical"/>

        <Router>
            <Header/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("library") view=LibraryPage/>
                    <Route path=StaticSegment("create") view=CreatePage/>
                    <Route path=StaticSegment("login") view=move || view! { <LoginPage auth=auth/> }/>
                    <Route path=StaticSegment("register") view=move || view! { <RegisterPage auth=auth/> }/>
                </Routes>
            </main>
        </Router>
    }
}
