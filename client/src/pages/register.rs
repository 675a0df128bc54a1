//! Registration page.
//!
//! Shows the signup form while nobody is signed in. The identity snapshot is
//! passed in explicitly; on mount and after every identity change the page
//! checks it and, once a user is present, navigates home exactly once for
//! that identity.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::register_form::RegisterForm;
use crate::state::auth::AuthState;
use crate::util::auth::install_authed_redirect;

/// Where the page sends an authenticated visitor.
pub const REDIRECT_TARGET: &str = "/";
pub const LOGIN_HREF: &str = "/login";
pub const HOME_HREF: &str = "/";

#[component]
pub fn RegisterPage(#[prop(into)] auth: Signal<AuthState>) -> impl IntoView {
    install_authed_redirect(auth, REDIRECT_TARGET, use_navigate());

    view! {
        <div class="auth-page">
            <Show when=move || !auth.get().is_authenticated()>
                <div class="auth-card">
                    <h1>"Create your account"</h1>
                    <p class="auth-card__subtitle">"Start writing your next book."</p>
                    <RegisterForm/>
                    <p class="auth-card__links">
                        "Already have an account? "
                        <a href=LOGIN_HREF>"Log in"</a>
                    </p>
                    <p class="auth-card__links">
                        <a href=HOME_HREF>"Back to home"</a>
                    </p>
                </div>
            </Show>
        </div>
    }
}
