//! Saved location handlers (session required)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use shared::{NewSavedLocation, SavedLocation};

use crate::error::{AppError, AppResult};
use crate::handlers::query::{parse_id, CoordinatesQuery};
use crate::middleware::CurrentUser;
use crate::services::{
    DashboardContext, DashboardService, DashboardView, LocationResolver, SavedLocationService,
};
use crate::AppState;

/// List the current user's saved locations
pub async fn list_locations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<SavedLocation>>> {
    let service = SavedLocationService::new(state.storage.clone());
    Ok(Json(service.list(user.user_id).await?))
}

/// Save a location
pub async fn create_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<NewSavedLocation>, AppError>,
) -> AppResult<(StatusCode, Json<SavedLocation>)> {
    let service = SavedLocationService::new(state.storage.clone());
    let location = service.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// Delete a saved location the user owns
pub async fn delete_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "location")?;

    let service = SavedLocationService::new(state.storage.clone());
    service.delete(user.user_id, id).await?;

    Ok(Json(json!({ "message": "Location deleted successfully" })))
}

/// Dashboard for a saved location
pub async fn get_location_weather(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    WithRejection(Query(params), _): WithRejection<Query<CoordinatesQuery>, AppError>,
) -> AppResult<Json<DashboardView>> {
    let id = parse_id(&id, "location")?;
    let units = params.units()?;

    let saved = SavedLocationService::new(state.storage.clone())
        .get_owned(user.user_id, id)
        .await?;
    let location = LocationResolver::new(state.gateway.clone(), &state.config.default_location)
        .from_saved(&saved)?;

    let ctx = DashboardContext::new(location, units, state.config.weather.day_bucketing);
    let view = DashboardService::new(state.gateway.clone()).load(&ctx).await?;
    Ok(Json(view))
}
