//! Login page: email + password.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::auth::install_authed_redirect;

#[component]
pub fn LoginPage(#[prop(into)] auth: Signal<AuthState>) -> impl IntoView {
    #[cfg(feature = "hydrate")]
    let auth_writer = expect_context::<RwSignal<AuthState>>();
    install_authed_redirect(auth, "/", use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if email_value.is_empty() || password_value.is_empty() {
            info.set("Enter both email and password.".to_owned());
            return;
        }
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::login(&email_value, &password_value).await {
                Ok(user) => {
                    info.set(String::new());
                    auth_writer.set(AuthState::signed_in(user));
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <Show when=move || !auth.get().is_authenticated()>
                <div class="auth-card">
                    <h1>"Welcome back"</h1>
                    <form class="auth-form" on:submit=on_submit>
                        <input
                            class="auth-input"
                            type="email"
                            placeholder="you@example.com"
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type="password"
                            placeholder="Password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <button class="auth-button" type="submit" disabled=move || busy.get()>
                            "Log in"
                        </button>
                    </form>
                    <Show when=move || !info.get().is_empty()>
                        <p class="auth-message">{move || info.get()}</p>
                    </Show>
                    <p class="auth-card__links">
                        "New here? "
                        <a href="/register">"Create an account"</a>
                    </p>
                </div>
            </Show>
        </div>
    }
}
