//! Identity region of the header: name + logout, or login/register links.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn UserMenu() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                crate::net::api::logout().await;
                auth.update(|a| a.user = None);
                if let Some(w) = web_sys::window() {
                    let _ = w.location().set_href("/login");
                }
            });
        }
    };

    view! {
        <div class="user-menu">
            {move || {
                let state = auth.get();
                match state.user {
                    Some(user) => {
                        view! {
                            <span class="user-menu__name" title=user.email>{user.name}</span>
                            <button class="btn user-menu__logout" on:click=on_logout>
                                "Log out"
                            </button>
                        }
                            .into_any()
                    }
                    None if state.loading => view! { <span class="user-menu__pending"></span> }.into_any(),
                    None => {
                        view! {
                            <a href="/login" class="user-menu__link">"Log in"</a>
                            <a href="/register" class="user-menu__link user-menu__link--primary">
                                "Sign up"
                            </a>
                        }
                            .into_any()
                    }
                }
            }}
        </div>
    }
}
