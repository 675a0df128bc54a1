//! Signup form. On success it writes the new user into the shared
//! `AuthState`; the surrounding page reacts to that change.

#[cfg(test)]
#[path = "register_form_test.rs"]
mod register_form_test;

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::state::auth::AuthState;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Local checks run before anything is sent.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_registration_input(name: &str, email: &str, password: &str, confirm: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Enter your name.".to_owned());
    }
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'));
    if !well_formed {
        return Err("Enter a valid email address.".to_owned());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {MIN_PASSWORD_LEN} characters."));
    }
    if password != confirm {
        return Err("Passwords do not match.".to_owned());
    }
    Ok(())
}

#[component]
pub fn RegisterForm() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    let auth = expect_context::<RwSignal<AuthState>>();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (name_value, email_value, password_value) = (name.get(), email.get(), password.get());
        if let Err(message) = validate_registration_input(&name_value, &email_value, &password_value, &confirm.get()) {
            info.set(message);
            return;
        }
        busy.set(true);
        info.set("Creating your account...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::register(name_value.trim(), email_value.trim(), &password_value).await {
                Ok(user) => {
                    log::info!("registered user {}", user.id);
                    info.set(String::new());
                    auth.set(AuthState::signed_in(user));
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (name_value, email_value, password_value);
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <input
                class="auth-input"
                type="text"
                placeholder="Your name"
                autocomplete="name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
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
                autocomplete="new-password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <input
                class="auth-input"
                type="password"
                placeholder="Confirm password"
                autocomplete="new-password"
                prop:value=move || confirm.get()
                on:input=move |ev| confirm.set(event_target_value(&ev))
            />
            <button class="auth-button" type="submit" disabled=move || busy.get()>
                "Create account"
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
        </form>
    }
}
