//! Authentication handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar},
    WithRejection,
};
use serde_json::{json, Value};

use shared::{LoginInput, RegisterInput, User};

use crate::error::{AppError, AppResult};
use crate::middleware::{session_cookie, session_token, CurrentUser};
use crate::services::AuthService;
use crate::AppState;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.storage.clone(), &state.config.session)
}

/// Register endpoint handler; the new account is logged in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<RegisterInput>, AppError>,
) -> AppResult<(StatusCode, CookieJar, Json<User>)> {
    let issued = auth_service(&state).register(input).await?;
    let cookie = session_cookie(&state.config.session, &issued.token)?;

    Ok((StatusCode::CREATED, jar.add(cookie), Json(issued.user)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, AppError>,
) -> AppResult<(CookieJar, Json<User>)> {
    let issued = auth_service(&state).login(input).await?;
    tracing::info!(user_id = issued.user.id, "User logged in");

    let cookie = session_cookie(&state.config.session, &issued.token)?;
    Ok((jar.add(cookie), Json(issued.user)))
}

/// Logout endpoint handler. Succeeds without a session.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<(CookieJar, Json<Value>)> {
    let cookie_name = state.config.session.cookie_name.clone();

    if let Some(token) = session_token(&jar, &headers, &cookie_name) {
        auth_service(&state).logout(&token).await?;
    }

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

/// Current user endpoint handler
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<User>> {
    Ok(Json(auth_service(&state).current_user(&user).await?))
}
