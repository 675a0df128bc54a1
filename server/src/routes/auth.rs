//! Auth routes: email + password registration and login, session cookie.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use uuid::Uuid;

use super::error_response;
use crate::services::account::{self, AccountError};
use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
const SESSION_DAYS: i64 = 30;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl AuthUser {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// COOKIES / ERRORS
// =============================================================================

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_DAYS))
        .build()
}

pub(crate) fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::Invalid(_) => StatusCode::BAD_REQUEST,
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::BadCredentials => StatusCode::UNAUTHORIZED,
        AccountError::Hash(_) | AccountError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn account_error_response(err: &AccountError) -> Response {
    let status = account_error_status(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "account operation failed");
        return error_response(status, "internal error");
    }
    error_response(status, err.to_string())
}

/// Start a session for `user` and answer with the user plus cookie.
async fn signed_in(state: &AppState, user: session::SessionUser, status: StatusCode) -> Response {
    match session::create_session(&state.pool, user.id).await {
        Ok(token) => {
            let jar = CookieJar::new().add(session_cookie(token, state.cookie_secure));
            (status, jar, Json(user.to_user())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "session create failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

/// `POST /api/auth/register`: create an account and sign it in.
pub async fn register(State(state): State<AppState>, Json(body): Json<RegisterBody>) -> Response {
    let registration = match account::validate_registration(&body.name, &body.email, &body.password) {
        Ok(r) => r,
        Err(e) => return account_error_response(&e),
    };
    match account::register(&state.pool, &registration).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user registered");
            signed_in(&state, user, StatusCode::CREATED).await
        }
        Err(e) => account_error_response(&e),
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

/// `POST /api/auth/login`
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    match account::authenticate(&state.pool, &body.email, &body.password).await {
        Ok(user) => signed_in(&state, user, StatusCode::OK).await,
        Err(e) => account_error_response(&e),
    }
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<books::User> {
    Json(auth.user.to_user())
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "session delete failed");
    }
    let jar = CookieJar::new().add(cleared_cookie(state.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
