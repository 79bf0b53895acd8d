//! Weather data models normalized from the upstream provider

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::UnitSystem;

/// Weather condition as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Provider condition id (e.g. 500 for light rain)
    pub code: u32,
    /// Condition group ("Rain", "Clouds", ...)
    pub main: String,
    /// Human readable description
    pub text: String,
    /// Icon code for the provider's icon set
    pub icon: String,
}

/// Current conditions for a location, one per fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    /// Observation time, Unix seconds
    pub observed_at: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity_percent: i32,
    pub pressure_hpa: i32,
    pub wind_speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_deg: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_meters: Option<i32>,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
    pub timezone_offset_seconds: i32,
    /// Unit system the temperatures and wind speed are expressed in
    pub units: UnitSystem,
}

/// One raw forecast sample (3-hour cadence upstream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Unix seconds
    pub timestamp: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity_percent: i32,
    pub wind_speed: f64,
    /// Probability of precipitation (0-1)
    pub pop: f64,
    pub condition: Condition,
}

/// Ordered forecast series for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    pub location_name: String,
    pub country: String,
    /// Location's UTC offset as reported by the provider
    pub timezone_offset_seconds: i32,
    pub units: UnitSystem,
    pub points: Vec<ForecastPoint>,
}

/// Day-level summary derived from forecast points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub condition: Condition,
    /// Timestamp of the point the condition was taken from
    pub representative_timestamp: i64,
}

/// Severe weather advisory issued by the provider.
///
/// Field names follow the provider's payload so the list can be passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub sender_name: String,
    #[serde(rename = "event")]
    pub event_name: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
