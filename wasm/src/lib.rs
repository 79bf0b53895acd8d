//! WebAssembly module for the Weather Dashboard
//!
//! Exposes the shared display helpers, the forecast aggregator and the
//! advisory classifier to the browser client. Complex values cross the
//! boundary as JSON strings in the backend's wire format.

use chrono::{FixedOffset, NaiveDate};
use wasm_bindgen::prelude::*;

use shared::format;
use shared::{classify, daily_summaries, CurrentConditions, ForecastPoint, UnitSystem};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn parse_units(units: &str) -> Result<UnitSystem, String> {
    units.parse().map_err(|e: shared::ParseUnitSystemError| e.to_string())
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// `"73°F"` style temperature label
#[wasm_bindgen]
pub fn format_temperature(temp: f64, units: &str) -> Result<String, JsValue> {
    let units = parse_units(units).map_err(to_js)?;
    Ok(format::format_temperature(temp, units))
}

/// `"5.8 mph"` style wind label
#[wasm_bindgen]
pub fn format_wind_speed(speed: f64, units: &str) -> Result<String, JsValue> {
    let units = parse_units(units).map_err(to_js)?;
    Ok(format::format_wind_speed(speed, units))
}

/// The other unit system, for the units toggle
#[wasm_bindgen]
pub fn toggle_units(units: &str) -> Result<String, JsValue> {
    let units = parse_units(units).map_err(to_js)?;
    Ok(units.toggled().to_string())
}

/// Temperature re-expressed after a units toggle
#[wasm_bindgen]
pub fn convert_temperature(temp: f64, from_units: &str, to_units: &str) -> Result<f64, JsValue> {
    let from = parse_units(from_units).map_err(to_js)?;
    let to = parse_units(to_units).map_err(to_js)?;
    Ok(format::convert_temperature(temp, from, to))
}

#[wasm_bindgen]
pub fn convert_wind_speed(speed: f64, from_units: &str, to_units: &str) -> Result<f64, JsValue> {
    let from = parse_units(from_units).map_err(to_js)?;
    let to = parse_units(to_units).map_err(to_js)?;
    Ok(format::convert_wind_speed(speed, from, to))
}

/// `"Monday, July 1st"` for a Unix timestamp at the location's UTC offset
#[wasm_bindgen]
pub fn format_date(timestamp: f64, offset_seconds: i32) -> Result<String, JsValue> {
    date_label(timestamp, offset_seconds).map_err(to_js)
}

/// `"3:05 PM"` for a Unix timestamp at the location's UTC offset
#[wasm_bindgen]
pub fn format_time(timestamp: f64, offset_seconds: i32) -> Result<String, JsValue> {
    time_label(timestamp, offset_seconds).map_err(to_js)
}

/// `"Jul 1"` for a summary date (`YYYY-MM-DD`)
#[wasm_bindgen]
pub fn format_day_month(date: &str) -> Result<String, JsValue> {
    parse_date(date).map(format::format_day_month).map_err(to_js)
}

/// Row label for the daily forecast, `"Today"` for the first row
#[wasm_bindgen]
pub fn day_label(index: usize, date: &str) -> Result<String, JsValue> {
    parse_date(date)
        .map(|date| format::day_label(index, date))
        .map_err(to_js)
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {:?}: {}", date, e))
}

fn local_datetime(
    timestamp: f64,
    offset_seconds: i32,
) -> Result<chrono::DateTime<FixedOffset>, String> {
    format::local_datetime(timestamp as i64, offset_seconds)
        .ok_or_else(|| format!("Invalid timestamp {} at offset {}", timestamp, offset_seconds))
}

fn date_label(timestamp: f64, offset_seconds: i32) -> Result<String, String> {
    local_datetime(timestamp, offset_seconds).map(|dt| format::format_date(&dt))
}

fn time_label(timestamp: f64, offset_seconds: i32) -> Result<String, String> {
    local_datetime(timestamp, offset_seconds).map(|dt| format::format_time(&dt))
}

/// Bucket forecast points into day summaries in the browser's time zone.
///
/// `points_json` is an array of forecast points; the result is a JSON array
/// of at most `days` summaries.
#[wasm_bindgen]
pub fn group_forecast_by_day(points_json: &str, days: usize) -> Result<String, JsValue> {
    // getTimezoneOffset is minutes behind UTC
    let offset_minutes = js_sys::Date::new_0().get_timezone_offset();
    let offset_seconds = -(offset_minutes * 60.0) as i32;

    group_points(points_json, offset_seconds, days).map_err(to_js)
}

fn group_points(points_json: &str, offset_seconds: i32, days: usize) -> Result<String, String> {
    let points: Vec<ForecastPoint> =
        serde_json::from_str(points_json).map_err(|e| format!("Invalid forecast JSON: {}", e))?;
    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| format!("Invalid UTC offset: {}", offset_seconds))?;

    let summaries = daily_summaries(&points, &offset, days);
    serde_json::to_string(&summaries).map_err(|e| e.to_string())
}

/// Advisory for current conditions as JSON, or `null` when none applies
#[wasm_bindgen]
pub fn classify_advisory(conditions_json: &str) -> Result<String, JsValue> {
    advisory_json(conditions_json).map_err(to_js)
}

fn advisory_json(conditions_json: &str) -> Result<String, String> {
    let conditions: CurrentConditions = serde_json::from_str(conditions_json)
        .map_err(|e| format!("Invalid conditions JSON: {}", e))?;
    serde_json::to_string(&classify(&conditions)).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn uv_index_description(uv_index: f64) -> String {
    format::uv_index_description(uv_index).to_string()
}

/// Provider icon image URL; `size` is 1, 2 or 4, other values use 2
#[wasm_bindgen]
pub fn icon_url(icon: &str, size: u8) -> String {
    format::icon_url(icon, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn point(timestamp: i64, temp: f64) -> Value {
        json!({
            "timestamp": timestamp,
            "temp": temp,
            "feelsLike": temp,
            "humidityPercent": 50,
            "windSpeed": 3.0,
            "pop": 0.0,
            "condition": { "code": 800, "main": "Clear", "text": "clear sky", "icon": "01d" }
        })
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_temperature(72.6, "imperial").unwrap(), "73°F");
        assert_eq!(format_temperature(-0.4, "metric").unwrap(), "0°C");
        assert_eq!(format_wind_speed(5.8, "imperial").unwrap(), "5.8 mph");
        assert_eq!(toggle_units("metric").unwrap(), "imperial");
        assert!(parse_units("kelvin").is_err());
    }

    #[test]
    fn test_unit_toggle() {
        assert_eq!(convert_temperature(100.0, "metric", "imperial").unwrap(), 212.0);
        assert_eq!(convert_wind_speed(3.0, "imperial", "imperial").unwrap(), 3.0);
    }

    #[test]
    fn test_timestamp_labels() {
        // 2024-07-01T15:05:00Z
        assert_eq!(date_label(1_719_846_300.0, 0).unwrap(), "Monday, July 1st");
        assert_eq!(time_label(1_719_846_300.0, -4 * 3600).unwrap(), "11:05 AM");
        assert!(time_label(1_719_846_300.0, 100_000).is_err());

        assert_eq!(format_day_month("2024-07-02").unwrap(), "Jul 2");
        assert_eq!(day_label(0, "2024-07-02").unwrap(), "Today");
        assert_eq!(day_label(1, "2024-07-02").unwrap(), "Tue");
        assert!(parse_date("07/02/2024").is_err());
    }

    #[test]
    fn test_group_points_in_offset() {
        // 2024-07-01T04:00Z is local midnight at UTC-4
        let start = 1_719_806_400;
        let points: Vec<_> = (0..10).map(|i| point(start + i * 3 * 3600, 60.0 + i as f64)).collect();
        let json = serde_json::to_string(&points).unwrap();

        let grouped: Value = serde_json::from_str(&group_points(&json, -4 * 3600, 5).unwrap()).unwrap();
        let days = grouped.as_array().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["date"], "2024-07-01");
        assert_eq!(days[0]["maxTemp"], 67.0);
        assert_eq!(days[1]["minTemp"], 68.0);

        let one: Value = serde_json::from_str(&group_points(&json, -4 * 3600, 1).unwrap()).unwrap();
        assert_eq!(one.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_group_points_rejects_bad_input() {
        assert!(group_points("not json", 0, 5).is_err());
        assert!(group_points("[]", 90_000, 5).is_err());
        assert_eq!(group_points("[]", 0, 5).unwrap(), "[]");
    }

    #[test]
    fn test_advisory_json() {
        let conditions = json!({
            "locationName": "New York",
            "country": "US",
            "observedAt": 1_719_846_300,
            "temp": 31.0,
            "feelsLike": 33.0,
            "humidityPercent": 40,
            "pressureHpa": 1012,
            "windSpeed": 2.0,
            "condition": { "code": 800, "main": "Clear", "text": "clear sky", "icon": "01d" },
            "timezoneOffsetSeconds": -14400,
            "units": "metric"
        });

        let advisory: Value =
            serde_json::from_str(&advisory_json(&conditions.to_string()).unwrap()).unwrap();
        assert_eq!(advisory["kind"], "heat");

        let mut mild = conditions.clone();
        mild["temp"] = json!(20.0);
        assert_eq!(advisory_json(&mild.to_string()).unwrap(), "null");
    }

    #[test]
    fn test_icon_and_uv() {
        assert_eq!(icon_url("10d", 2), "https://openweathermap.org/img/wn/10d@2x.png");
        assert_eq!(icon_url("10d", 8), "https://openweathermap.org/img/wn/10d@2x.png");
        assert_eq!(uv_index_description(6.5), "High");
    }
}
