use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_to_user_stringifies_id() {
    let id = Uuid::new_v4();
    let user = SessionUser { id, name: "Ada".into(), email: "ada@example.com".into() }.to_user();
    assert_eq!(user.id, id.to_string());
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
}

#[test]
fn session_user_serializes_same_shape_as_wire_user() {
    let su = SessionUser { id: Uuid::nil(), name: "Ada".into(), email: "a@b.c".into() };
    let parsed: books::User = serde_json::from_value(serde_json::to_value(&su).unwrap()).unwrap();
    assert_eq!(parsed, su.to_user());
}
