//! Shared auth redirect helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Auth pages (login, register) leave as soon as an identity appears; member
//! pages (library, create) leave once the identity probe has finished without
//! one. Both read the session through an explicit `Signal<AuthState>` rather
//! than reaching into context themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// Edge detector for "identity became present".
///
/// Remembers the last identity it saw and fires only when a present identity
/// differs from it, so re-running with an unchanged snapshot never asks for a
/// second navigation. Snapshots taken while the identity probe is loading are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedirectGuard {
    /// `None` until the first settled snapshot; then the last user id seen.
    last_seen: Option<Option<String>>,
}

impl RedirectGuard {
    /// Feed the latest snapshot. Returns `true` when a redirect should be
    /// issued now.
    pub fn observe(&mut self, state: &AuthState) -> bool {
        if state.loading {
            return false;
        }
        let current = state.user.as_ref().map(|u| u.id.clone());
        let fire = current.is_some() && self.last_seen.as_ref() != Some(&current);
        self.last_seen = Some(current);
        fire
    }
}

/// Navigate to `target` whenever an identity appears.
///
/// Runs once on mount and again after every change of `auth`.
pub fn install_authed_redirect<F>(auth: Signal<AuthState>, target: &'static str, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move |prev: Option<RedirectGuard>| {
        let mut guard = prev.unwrap_or_default();
        if guard.observe(&auth.get()) {
            navigate(target, NavigateOptions::default());
        }
        guard
    });
}

/// Whether a member-only page should send the visitor to `/login`.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Redirect to `/login` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: Signal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });
}
