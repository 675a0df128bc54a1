use super::*;
use crate::net::types::User;
use crate::util::auth::RedirectGuard;

/// Replays identity snapshots the way the page effect sees them and records
/// every navigation target it would issue.
fn navigations(states: &[AuthState]) -> Vec<&'static str> {
    let mut guard = RedirectGuard::default();
    states
        .iter()
        .filter(|s| guard.observe(s))
        .map(|_| REDIRECT_TARGET)
        .collect()
}

fn signed_out() -> AuthState {
    AuthState { user: None, loading: false }
}

fn u1() -> AuthState {
    AuthState::signed_in(User { id: "u1".into(), name: "Ada".into(), email: "ada@example.com".into() })
}

#[test]
fn signed_in_visitor_is_sent_home_once() {
    assert_eq!(navigations(&[u1()]), ["/"]);
}

#[test]
fn signed_out_visitor_sees_links_and_stays() {
    assert!(navigations(&[signed_out()]).is_empty());
    assert_eq!(LOGIN_HREF, "/login");
    assert_eq!(HOME_HREF, "/");
}

#[test]
fn registering_while_on_page_navigates_home_once() {
    assert_eq!(navigations(&[signed_out(), u1(), u1()]), ["/"]);
}
