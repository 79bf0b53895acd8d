//! Location lookup handlers

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use shared::Location;

use crate::error::{AppError, AppResult};
use crate::handlers::query::CoordinatesQuery;
use crate::services::LocationResolver;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn resolver(state: &AppState) -> LocationResolver {
    LocationResolver::new(state.gateway.clone(), &state.config.default_location)
}

/// Up to five candidates for a free-text query
pub async fn search_locations(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<Location>>> {
    let q = params
        .q
        .ok_or_else(|| AppError::InvalidRequest("Search query is required".to_string()))?;

    Ok(Json(resolver(&state).from_search(&q).await?))
}

/// Named location for device coordinates
pub async fn reverse_location(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<CoordinatesQuery>, AppError>,
) -> AppResult<Json<Location>> {
    let (lat, lon) = params.coordinates()?;
    Ok(Json(resolver(&state).from_coordinates(lat, lon).await?))
}

/// The configured fallback location
pub async fn default_location(State(state): State<AppState>) -> Json<Location> {
    Json(resolver(&state).fallback())
}
