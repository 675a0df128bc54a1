use super::*;

fn count(href: &str) -> usize {
    NAV_LINKS.iter().filter(|l| l.href == href).count()
}

#[test]
fn exactly_one_link_per_destination() {
    assert_eq!(count("/"), 1);
    assert_eq!(count("/library"), 1);
    assert_eq!(count("/create"), 1);
    assert_eq!(NAV_LINKS.len(), 3);
}

#[test]
fn home_link_comes_first() {
    assert_eq!(NAV_LINKS[0].href, "/");
}

#[test]
fn labels_are_not_empty() {
    assert!(NAV_LINKS.iter().all(|l| !l.label.trim().is_empty()));
}
