//! Dashboard aggregation
//!
//! Fans out to current conditions, forecast and alerts concurrently and
//! assembles the view the client renders. Current conditions and forecast
//! are required; upstream alert failures degrade to an empty list inside the
//! gateway and never fail the dashboard.

use serde::Serialize;

use shared::{
    classify, hourly, summarize_series, Advisory, Alert, CurrentConditions, DailySummary,
    DayBucketing, ForecastPoint, Location, UnitSystem, DEFAULT_FORECAST_DAYS,
    DEFAULT_HOURLY_POINTS,
};

use crate::error::AppResult;
use crate::external::WeatherGateway;

/// Per-request session state the aggregation runs against
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub location: Location,
    pub units: UnitSystem,
    pub bucketing: DayBucketing,
}

impl DashboardContext {
    pub fn new(location: Location, units: UnitSystem, bucketing: DayBucketing) -> Self {
        Self {
            location,
            units,
            bucketing,
        }
    }
}

/// Everything the dashboard shows for one location
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub location: Location,
    pub units: UnitSystem,
    pub current: CurrentConditions,
    pub hourly: Vec<ForecastPoint>,
    pub daily: Vec<DailySummary>,
    pub alerts: Vec<Alert>,
    pub advisory: Option<Advisory>,
}

#[derive(Clone)]
pub struct DashboardService {
    gateway: WeatherGateway,
}

impl DashboardService {
    pub fn new(gateway: WeatherGateway) -> Self {
        Self { gateway }
    }

    /// Load the dashboard for the context's location
    pub async fn load(&self, ctx: &DashboardContext) -> AppResult<DashboardView> {
        let Location { lat, lon, .. } = ctx.location;

        let (current, forecast, alerts) = tokio::join!(
            self.gateway.fetch_current_conditions(lat, lon, ctx.units),
            self.gateway.fetch_forecast(lat, lon, ctx.units),
            self.gateway.fetch_alerts(lat, lon),
        );

        let current = current?;
        let forecast = forecast?;
        let alerts = alerts?;

        let daily = summarize_series(&forecast, ctx.bucketing, DEFAULT_FORECAST_DAYS);
        let hourly = hourly(&forecast.points, DEFAULT_HOURLY_POINTS).to_vec();
        let advisory = classify(&current);

        tracing::debug!(
            location = %ctx.location.display_name(),
            units = %ctx.units,
            days = daily.len(),
            alerts = alerts.len(),
            advisory = advisory.is_some(),
            "Dashboard assembled"
        );

        Ok(DashboardView {
            location: ctx.location.clone(),
            units: ctx.units,
            current,
            hourly,
            daily,
            alerts,
            advisory,
        })
    }
}
