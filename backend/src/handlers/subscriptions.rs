//! Alert subscription handlers (session required)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use shared::{AlertSubscription, NewAlertSubscription};

use crate::error::{AppError, AppResult};
use crate::handlers::query::parse_id;
use crate::middleware::CurrentUser;
use crate::services::SubscriptionService;
use crate::AppState;

pub async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<AlertSubscription>>> {
    let service = SubscriptionService::new(state.storage.clone());
    Ok(Json(service.list(user.user_id).await?))
}

pub async fn create_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<NewAlertSubscription>, AppError>,
) -> AppResult<(StatusCode, Json<AlertSubscription>)> {
    let service = SubscriptionService::new(state.storage.clone());
    let subscription = service.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Toggle a subscription. The body must be `{ "enabled": <bool> }`.
pub async fn update_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<AlertSubscription>> {
    let id = parse_id(&id, "alert")?;
    let enabled = body
        .get("enabled")
        .and_then(Value::as_bool)
        .ok_or_else(|| AppError::InvalidRequest("Invalid parameters".to_string()))?;

    let service = SubscriptionService::new(state.storage.clone());
    Ok(Json(service.set_enabled(user.user_id, id, enabled).await?))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "alert")?;

    let service = SubscriptionService::new(state.storage.clone());
    service.delete(user.user_id, id).await?;

    Ok(Json(json!({ "message": "Alert deleted successfully" })))
}
