//! Weather HTTP handlers

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use shared::{summarize_series, Alert, CurrentConditions, DailySummary, ForecastSeries};

use crate::error::{AppError, AppResult};
use crate::handlers::query::CoordinatesQuery;
use crate::services::{DashboardContext, DashboardService, DashboardView, LocationResolver};
use crate::AppState;

type CoordinatesParams = WithRejection<Query<CoordinatesQuery>, AppError>;

/// Current conditions for a coordinate pair
pub async fn get_current_weather(
    State(state): State<AppState>,
    WithRejection(Query(params), _): CoordinatesParams,
) -> AppResult<Json<CurrentConditions>> {
    let (lat, lon) = params.coordinates()?;
    let units = params.units()?;

    let current = state
        .gateway
        .fetch_current_conditions(lat, lon, units)
        .await?;
    Ok(Json(current))
}

/// Raw forecast series
pub async fn get_forecast(
    State(state): State<AppState>,
    WithRejection(Query(params), _): CoordinatesParams,
) -> AppResult<Json<ForecastSeries>> {
    let (lat, lon) = params.coordinates()?;
    let units = params.units()?;

    let forecast = state.gateway.fetch_forecast(lat, lon, units).await?;
    Ok(Json(forecast))
}

/// Forecast bucketed into day summaries
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    WithRejection(Query(params), _): CoordinatesParams,
) -> AppResult<Json<Vec<DailySummary>>> {
    let (lat, lon) = params.coordinates()?;
    let units = params.units()?;
    let days = params.days()?;

    let forecast = state.gateway.fetch_forecast(lat, lon, units).await?;
    Ok(Json(summarize_series(
        &forecast,
        state.config.weather.day_bucketing,
        days,
    )))
}

/// Provider alerts; upstream failures yield an empty list, a missing
/// credential does not
pub async fn get_weather_alerts(
    State(state): State<AppState>,
    WithRejection(Query(params), _): CoordinatesParams,
) -> AppResult<Json<Vec<Alert>>> {
    let (lat, lon) = params.coordinates()?;
    Ok(Json(state.gateway.fetch_alerts(lat, lon).await?))
}

/// Aggregated dashboard.
///
/// Without coordinates the dashboard falls back to the default location,
/// as the client does when geolocation is unavailable.
pub async fn get_dashboard(
    State(state): State<AppState>,
    WithRejection(Query(params), _): CoordinatesParams,
) -> AppResult<Json<DashboardView>> {
    let units = params.units()?;
    let position = params
        .try_coordinates()?
        .map(|(lat, lon)| shared::Coordinates::new(lat, lon));

    let resolver = LocationResolver::new(state.gateway.clone(), &state.config.default_location);
    let location = resolver.from_device(position).await?;

    let ctx = DashboardContext::new(location, units, state.config.weather.day_bucketing);
    let view = DashboardService::new(state.gateway.clone()).load(&ctx).await?;
    Ok(Json(view))
}
