//! OpenWeatherMap gateway
//!
//! Fetches current conditions, forecasts, alerts, geocoding results and map
//! tiles, and normalizes provider payloads into the shared models.
//!
//! Each operation has a fixed [`FailurePolicy`]. Hard-fail operations
//! propagate upstream failures as [`AppError`]; soft-fail operations log
//! the failure and return an empty result. No operation retries.

use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use shared::validation::{validate_search_query, validate_tile};
use shared::{
    Alert, Condition, CurrentConditions, ForecastPoint, ForecastSeries, Location, MapLayer,
    TileCoordinate, UnitSystem,
};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Geocoding candidates requested per search
pub const SEARCH_LIMIT: usize = 5;

// ============================================================================
// Failure policy
// ============================================================================

/// Upstream operations the gateway performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOperation {
    CurrentConditions,
    Forecast,
    Alerts,
    Search,
    ReverseGeocode,
    Tile,
}

/// What a failed upstream call turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the failure to the caller
    HardFail,
    /// Log it and hand back an empty result
    SoftFailToEmpty,
}

impl UpstreamOperation {
    pub const ALL: [UpstreamOperation; 6] = [
        UpstreamOperation::CurrentConditions,
        UpstreamOperation::Forecast,
        UpstreamOperation::Alerts,
        UpstreamOperation::Search,
        UpstreamOperation::ReverseGeocode,
        UpstreamOperation::Tile,
    ];

    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            UpstreamOperation::CurrentConditions
            | UpstreamOperation::Forecast
            | UpstreamOperation::Search
            | UpstreamOperation::Tile => FailurePolicy::HardFail,
            UpstreamOperation::Alerts | UpstreamOperation::ReverseGeocode => {
                FailurePolicy::SoftFailToEmpty
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            UpstreamOperation::CurrentConditions => "current_conditions",
            UpstreamOperation::Forecast => "forecast",
            UpstreamOperation::Alerts => "alerts",
            UpstreamOperation::Search => "search",
            UpstreamOperation::ReverseGeocode => "reverse_geocode",
            UpstreamOperation::Tile => "tile",
        }
    }
}

impl fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Provider payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct OWMWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    pressure: i32,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
    deg: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct OWMSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    visibility: Option<i32>,
    wind: OWMWind,
    dt: i64,
    #[serde(default)]
    sys: OWMSys,
    #[serde(default)]
    timezone: i32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    city: OWMCity,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    weather: Vec<OWMWeather>,
    wind: OWMWind,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OWMAlertsResponse {
    #[serde(default)]
    alerts: Vec<serde_json::Value>,
}

impl OWMAlertsResponse {
    /// Keep every alert that parses; a malformed entry only drops itself
    fn into_alerts(self) -> Vec<Alert> {
        self.alerts
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<Alert>(raw) {
                Ok(alert) => Some(alert),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed provider alert");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OWMGeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

fn condition_from(weather: &[OWMWeather]) -> Condition {
    weather
        .first()
        .map(|w| Condition {
            code: w.id,
            main: w.main.clone(),
            text: w.description.clone(),
            icon: w.icon.clone(),
        })
        .unwrap_or_default()
}

impl OWMCurrentResponse {
    fn into_conditions(self, units: UnitSystem) -> CurrentConditions {
        CurrentConditions {
            condition: condition_from(&self.weather),
            location_name: self.name,
            country: self.sys.country.unwrap_or_default(),
            observed_at: self.dt,
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            humidity_percent: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_deg: self.wind.deg,
            visibility_meters: self.visibility,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            timezone_offset_seconds: self.timezone,
            units,
        }
    }
}

impl OWMForecastResponse {
    fn into_series(self, units: UnitSystem) -> ForecastSeries {
        let points = self
            .list
            .into_iter()
            .map(|item| ForecastPoint {
                condition: condition_from(&item.weather),
                timestamp: item.dt,
                temp: item.main.temp,
                feels_like: item.main.feels_like,
                humidity_percent: item.main.humidity,
                wind_speed: item.wind.speed,
                pop: item.pop,
            })
            .collect();

        ForecastSeries {
            location_name: self.city.name,
            country: self.city.country,
            timezone_offset_seconds: self.city.timezone,
            units,
            points,
        }
    }
}

impl From<OWMGeocodeEntry> for Location {
    fn from(entry: OWMGeocodeEntry) -> Self {
        Location {
            name: entry.name,
            lat: entry.lat,
            lon: entry.lon,
            country: entry.country,
            state: entry.state,
        }
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Client for the weather provider
#[derive(Clone)]
pub struct WeatherGateway {
    client: Client,
    api_key: Option<Arc<str>>,
    api_base: String,
    geo_base: String,
    tile_base: String,
}

impl WeatherGateway {
    /// Create a gateway from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(Arc::from),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            geo_base: config.geo_base.trim_end_matches('/').to_string(),
            tile_base: config.tile_base.trim_end_matches('/').to_string(),
        })
    }

    /// Create a gateway with every endpoint under one base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> AppResult<Self> {
        Self::new(&WeatherConfig {
            api_key,
            api_base: base_url.to_string(),
            geo_base: base_url.to_string(),
            tile_base: base_url.to_string(),
            ..WeatherConfig::default()
        })
    }

    /// The configured credential; checked whenever an operation runs
    fn credential(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "OpenWeather API key is missing. Set WXDASH__WEATHER__API_KEY or OPENWEATHER_API_KEY"
                    .to_string(),
            )
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current conditions by coordinates
    pub async fn fetch_current_conditions(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> AppResult<CurrentConditions> {
        let op = UpstreamOperation::CurrentConditions;
        let result = self
            .get_json::<OWMCurrentResponse>(
                op,
                &format!("{}/data/2.5/weather", self.api_base),
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", units.to_string()),
                ],
            )
            .await
            .map(|data| data.into_conditions(units));

        settle(op, result)
    }

    /// Fetch the 3-hourly forecast series by coordinates
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: UnitSystem,
    ) -> AppResult<ForecastSeries> {
        let op = UpstreamOperation::Forecast;
        let result = self
            .get_json::<OWMForecastResponse>(
                op,
                &format!("{}/data/2.5/forecast", self.api_base),
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", units.to_string()),
                ],
            )
            .await
            .map(|data| data.into_series(units));

        settle(op, result)
    }

    /// Fetch active alerts.
    ///
    /// Only a missing credential is an error. An endpoint the credential's
    /// tier cannot reach, any other upstream failure or a body without
    /// `alerts` all yield an empty list.
    pub async fn fetch_alerts(&self, lat: f64, lon: f64) -> AppResult<Vec<Alert>> {
        self.credential()?;

        let op = UpstreamOperation::Alerts;
        let result = self
            .get_json::<OWMAlertsResponse>(
                op,
                &format!("{}/data/2.5/onecall", self.api_base),
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("exclude", "current,minutely,hourly,daily".to_string()),
                ],
            )
            .await
            .map(OWMAlertsResponse::into_alerts);

        settle(op, result)
    }

    /// Search places by free text, provider order, at most five
    pub async fn search_locations(&self, query: &str) -> AppResult<Vec<Location>> {
        let query = validate_search_query(query).map_err(|e| AppError::InvalidRequest(e.into()))?;

        let op = UpstreamOperation::Search;
        let result = self
            .get_json::<Vec<OWMGeocodeEntry>>(
                op,
                &format!("{}/geo/1.0/direct", self.geo_base),
                &[("q", query.to_string()), ("limit", SEARCH_LIMIT.to_string())],
            )
            .await
            .map(|entries| {
                entries
                    .into_iter()
                    .take(SEARCH_LIMIT)
                    .map(Location::from)
                    .collect()
            });

        settle(op, result)
    }

    /// Name the place at the given coordinates; empty when unknown or on
    /// any upstream failure
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Vec<Location> {
        let op = UpstreamOperation::ReverseGeocode;
        let result = self
            .get_json::<Vec<OWMGeocodeEntry>>(
                op,
                &format!("{}/geo/1.0/reverse", self.geo_base),
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await
            .map(|entries| entries.into_iter().map(Location::from).collect());

        settle(op, result).unwrap_or_default()
    }

    /// Proxy a map tile so the credential stays on the server
    pub async fn fetch_tile(&self, layer: MapLayer, tile: TileCoordinate) -> AppResult<Bytes> {
        validate_tile(&tile).map_err(|e| AppError::InvalidRequest(e.into()))?;

        let op = UpstreamOperation::Tile;
        let url = format!(
            "{}/map/{}/{}/{}/{}.png",
            self.tile_base,
            layer.tile_name(),
            tile.z,
            tile.x,
            tile.y
        );
        let result = match self.send(op, &url, &[]).await {
            Ok(response) => response.bytes().await.map_err(|e| {
                AppError::UpstreamUnavailable(format!("{} body: {}", op, e))
            }),
            Err(e) => Err(e),
        };

        settle(op, result)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        op: UpstreamOperation,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.send(op, url, query).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("{} response: {}", op, e)))
    }

    async fn send(
        &self,
        op: UpstreamOperation,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<reqwest::Response> {
        let api_key = self.credential()?;

        tracing::debug!(operation = %op, url, "Calling weather provider");

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, which carries the credential
                AppError::UpstreamUnavailable(format!("{} request failed: {}", op, e.without_url()))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && op.failure_policy() == FailurePolicy::SoftFailToEmpty
        {
            tracing::info!(
                operation = %op,
                "Provider refused this endpoint for the configured key; it may require a paid plan"
            );
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::UpstreamUnavailable(format!(
            "{} returned {}: {}",
            op, status, body
        )))
    }
}

/// Apply the operation's failure policy to its outcome
fn settle<T: Default>(op: UpstreamOperation, result: AppResult<T>) -> AppResult<T> {
    match (op.failure_policy(), result) {
        (_, Ok(value)) => Ok(value),
        (FailurePolicy::HardFail, Err(e)) => {
            tracing::warn!(operation = %op, error = %e, "Weather provider call failed");
            Err(e)
        }
        (FailurePolicy::SoftFailToEmpty, Err(e)) => {
            tracing::warn!(operation = %op, error = %e, "Weather provider call failed, using empty result");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let soft: Vec<_> = UpstreamOperation::ALL
            .into_iter()
            .filter(|op| op.failure_policy() == FailurePolicy::SoftFailToEmpty)
            .collect();
        assert_eq!(
            soft,
            vec![UpstreamOperation::Alerts, UpstreamOperation::ReverseGeocode]
        );
    }

    #[test]
    fn test_settle_soft_fail_returns_empty() {
        let result: AppResult<Vec<Alert>> =
            settle(UpstreamOperation::Alerts, Err(AppError::UpstreamUnavailable("500".into())));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_settle_hard_fail_propagates() {
        let result: AppResult<Vec<Location>> =
            settle(UpstreamOperation::Search, Err(AppError::UpstreamUnavailable("500".into())));
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let gateway = WeatherGateway::with_base_url(Some("  ".into()), "http://localhost").unwrap();
        assert!(!gateway.has_credential());
        assert!(matches!(gateway.credential(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_malformed_alert_dropped_alone() {
        let payload = serde_json::json!({
            "alerts": [
                { "sender_name": "NWS", "event": "Heat Advisory", "start": 1719846000, "end": 1719889200, "description": "Hot" },
                { "sender_name": "NWS", "event": "Flood Watch", "description": "No window" }
            ]
        });

        let data: OWMAlertsResponse = serde_json::from_value(payload).unwrap();
        let alerts = data.into_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event_name, "Heat Advisory");
    }

    #[test]
    fn test_current_payload_normalized() {
        let payload = serde_json::json!({
            "coord": { "lon": -74.006, "lat": 40.7128 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "main": { "temp": 68.4, "feels_like": 67.9, "temp_min": 66.0, "temp_max": 70.0, "pressure": 1012, "humidity": 78 },
            "visibility": 10000,
            "wind": { "speed": 8.05, "deg": 200 },
            "dt": 1719846300,
            "sys": { "country": "US", "sunrise": 1719826000, "sunset": 1719880000 },
            "timezone": -14400,
            "name": "New York"
        });

        let data: OWMCurrentResponse = serde_json::from_value(payload).unwrap();
        let current = data.into_conditions(UnitSystem::Imperial);

        assert_eq!(current.location_name, "New York");
        assert_eq!(current.country, "US");
        assert_eq!(current.condition.code, 500);
        assert_eq!(current.condition.text, "light rain");
        assert_eq!(current.humidity_percent, 78);
        assert_eq!(current.wind_deg, Some(200));
        assert_eq!(current.timezone_offset_seconds, -14400);
    }
}
