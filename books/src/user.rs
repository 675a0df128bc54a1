//! Authenticated identity as seen by the browser.

use serde::{Deserialize, Serialize};

/// The signed-in user returned by `/api/auth/me`, `/api/auth/login` and
/// `/api/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Display name chosen at registration.
    pub name: String,
    /// Login email, lowercased.
    pub email: String,
}
