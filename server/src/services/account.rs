//! Email + password accounts: validation, hashing, registration, login.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use sqlx::{PgPool, Row};

use super::session::SessionUser;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    BadCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Trim + lowercase an email and check its basic `local@domain.tld` shape.
#[must_use]
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_ascii_lowercase();
    let (local, domain) = email.split_once('@')?;
    let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if local.is_empty() || domain.contains('@') || !domain_ok || email.chars().any(char::is_whitespace) {
        return None;
    }
    Some(email)
}

/// Check and normalize registration fields.
///
/// # Errors
///
/// Returns [`AccountError::Invalid`] describing the first bad field.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<Registration, AccountError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AccountError::Invalid("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AccountError::Invalid("name is too long"));
    }
    let email = normalize_email(email).ok_or(AccountError::Invalid("email is invalid"))?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Invalid("password must be at least 8 characters"));
    }
    Ok(Registration { name: name.to_owned(), email, password: password.to_owned() })
}

/// Hash a password with Argon2id and a random salt (PHC string format).
///
/// # Errors
///
/// Returns [`AccountError::Hash`] if salt encoding or hashing fails.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Hash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}

/// Check a password against a stored PHC hash. Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// Insert a new user.
///
/// # Errors
///
/// Returns [`AccountError::EmailTaken`] on a duplicate email.
pub async fn register(pool: &PgPool, registration: &Registration) -> Result<SessionUser, AccountError> {
    let hash = hash_password(&registration.password)?;
    let row = sqlx::query(
        r"INSERT INTO users (name, email, password_hash)
          VALUES ($1, $2, $3)
          RETURNING id",
    )
    .bind(&registration.name)
    .bind(&registration.email)
    .bind(&hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AccountError::EmailTaken,
        other => AccountError::Db(other),
    })?;

    Ok(SessionUser { id: row.get("id"), name: registration.name.clone(), email: registration.email.clone() })
}

/// Look up a user by email and check the password.
///
/// # Errors
///
/// Returns [`AccountError::BadCredentials`] for an unknown email or a wrong
/// password; the two are indistinguishable to callers.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<SessionUser, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::BadCredentials)?;
    let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::BadCredentials)?;

    let hash: String = row.get("password_hash");
    if !verify_password(password, &hash) {
        return Err(AccountError::BadCredentials);
    }
    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
