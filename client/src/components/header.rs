//! Persistent top navigation bar.
//!
//! The header has no inputs and no identity-dependent branches; identity
//! display belongs to [`UserMenu`].

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;

use crate::components::user_menu::UserMenu;

/// A site navigation link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

/// Links rendered by the header, left to right.
pub const NAV_LINKS: [NavLink; 3] = [
    NavLink { href: "/", label: "Clustica" },
    NavLink { href: "/library", label: "My Library" },
    NavLink { href: "/create", label: "Create" },
];

#[component]
pub fn Header() -> impl IntoView {
    let [home, rest @ ..] = NAV_LINKS;
    view! {
        <header class="header">
            <nav class="header__nav">
                <a href=home.href class="header__brand">{home.label}</a>
                {rest
                    .into_iter()
                    .map(|link| view! { <a href=link.href class="header__link">{link.label}</a> })
                    .collect_view()}
            </nav>
            <span class="header__spacer"></span>
            <div class="header__user">
                <UserMenu/>
            </div>
        </header>
    }
}
