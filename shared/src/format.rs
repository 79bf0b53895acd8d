//! Unit conversion and display formatting
//!
//! These mirror what the dashboard prints: rounded temperatures with a unit
//! symbol, raw wind speeds with a unit suffix and short date labels.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::types::UnitSystem;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

// ============================================================================
// Conversions
// ============================================================================

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * 2.236_936
}

pub fn mph_to_mps(mph: f64) -> f64 {
    mph / 2.236_936
}

/// Express a temperature reported in `units` as Fahrenheit
pub fn to_fahrenheit(temp: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Imperial => temp,
        UnitSystem::Metric => celsius_to_fahrenheit(temp),
    }
}

/// Re-express a temperature after the units toggle
pub fn convert_temperature(temp: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => celsius_to_fahrenheit(temp),
        (UnitSystem::Imperial, UnitSystem::Metric) => fahrenheit_to_celsius(temp),
        _ => temp,
    }
}

pub fn convert_wind_speed(speed: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => mps_to_mph(speed),
        (UnitSystem::Imperial, UnitSystem::Metric) => mph_to_mps(speed),
        _ => speed,
    }
}

/// Round half-up toward positive infinity, matching how the browser rounds
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// ============================================================================
// Display
// ============================================================================

/// `72.6` imperial → `"73°F"`
pub fn format_temperature(temp: f64, units: UnitSystem) -> String {
    let rounded = round_half_up(temp);
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{}", rounded, units.temperature_symbol())
}

/// Wind speed is printed as reported, without rounding
pub fn format_wind_speed(speed: f64, units: UnitSystem) -> String {
    format!("{} {}", speed, units.wind_speed_unit())
}

/// Convert a Unix timestamp into the given UTC offset
pub fn local_datetime(timestamp: i64, offset_seconds: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_seconds)?;
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Monday, July 1st"
pub fn format_date<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = datetime.day();
    format!(
        "{}{}",
        datetime.format("%A, %B %-d"),
        ordinal_suffix(day)
    )
}

/// "3:05 PM"
pub fn format_time<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    datetime.format("%-I:%M %p").to_string()
}

/// "Mon"
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// "Jul 1"
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Label for a row of the daily forecast; the first row reads "Today"
pub fn day_label(index: usize, date: NaiveDate) -> String {
    if index == 0 {
        "Today".to_string()
    } else {
        format_day(date)
    }
}

pub fn uv_index_description(uv_index: f64) -> &'static str {
    if uv_index <= 2.0 {
        "Low"
    } else if uv_index <= 5.0 {
        "Moderate"
    } else if uv_index <= 7.0 {
        "High"
    } else if uv_index <= 10.0 {
        "Very High"
    } else {
        "Extreme"
    }
}

/// Icon scales the provider serves
pub const ICON_SIZES: [u8; 3] = [1, 2, 4];

/// Provider icon image for a condition icon code.
///
/// `size` must be one of [`ICON_SIZES`]; anything else falls back to `2`.
pub fn icon_url(icon: &str, size: u8) -> String {
    let size = if ICON_SIZES.contains(&size) { size } else { 2 };
    format!("{}/{}@{}x.png", ICON_BASE_URL, icon, size)
}
