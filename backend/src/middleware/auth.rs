//! Session authentication middleware
//!
//! The session token is read from the session cookie, or from an
//! `Authorization: Bearer` header for non-browser clients.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::services::{AuthService, AuthUser};
use crate::AppState;

/// Token carried by the request, cookie first
pub fn session_token(jar: &CookieJar, headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = jar.get(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Cookie that carries a freshly issued session token
pub fn session_cookie(config: &SessionConfig, token: &str) -> AppResult<Cookie<'static>> {
    let mut raw = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, token, config.ttl_seconds
    );
    if config.secure {
        raw.push_str("; Secure");
    }

    Cookie::parse(raw).map_err(|e| AppError::Internal(format!("Session cookie: {}", e)))
}

/// Reject requests without a live session and attach the caller's identity
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&jar, request.headers(), &state.config.session.cookie_name)
        .ok_or(AppError::Unauthenticated)?;

    let auth = AuthService::new(state.storage.clone(), &state.config.session);
    let user = auth.authenticate(&token).await?;

    tracing::trace!(user_id = user.user_id, "Session authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated user.
/// Only usable on routes behind [`session_middleware`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}
