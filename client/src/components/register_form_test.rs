use super::*;

#[test]
fn accepts_complete_input() {
    assert_eq!(validate_registration_input("Ada", "ada@example.com", "longenough", "longenough"), Ok(()));
}

#[test]
fn requires_name() {
    assert_eq!(
        validate_registration_input("  ", "ada@example.com", "longenough", "longenough").unwrap_err(),
        "Enter your name."
    );
}

#[test]
fn rejects_malformed_email() {
    for email in ["", "ada", "@example.com", "ada@example", "ada@example."] {
        assert_eq!(
            validate_registration_input("Ada", email, "longenough", "longenough").unwrap_err(),
            "Enter a valid email address.",
            "email {email:?}"
        );
    }
}

#[test]
fn rejects_short_password() {
    assert_eq!(
        validate_registration_input("Ada", "ada@example.com", "short", "short").unwrap_err(),
        "Password must be at least 8 characters."
    );
}

#[test]
fn rejects_mismatched_confirmation() {
    assert_eq!(
        validate_registration_input("Ada", "ada@example.com", "longenough", "longenougH").unwrap_err(),
        "Passwords do not match."
    );
}
