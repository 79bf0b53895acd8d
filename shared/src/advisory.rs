//! Advisory classifier
//!
//! Derives at most one local advisory from current conditions. Rules are
//! checked in order and the first match wins.

use serde::{Deserialize, Serialize};

use crate::format::to_fahrenheit;
use crate::models::CurrentConditions;

/// Temperatures strictly above this (°F) raise a heat advisory
pub const HEAT_ADVISORY_THRESHOLD_F: f64 = 85.0;

/// Relative humidity strictly above this raises a thunderstorm watch
pub const THUNDERSTORM_HUMIDITY_THRESHOLD: i32 = 85;

const HOUR_SECONDS: i64 = 3600;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Heat,
    SevereThunderstorm,
    Flood,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySeverity {
    Warning,
    Danger,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub title: String,
    pub description: String,
    pub severity: AdvisorySeverity,
    /// Unix seconds
    pub effective_from: i64,
    /// Unix seconds
    pub effective_until: i64,
}

impl AdvisoryKind {
    pub fn title(&self) -> &'static str {
        match self {
            AdvisoryKind::Heat => "Heat Advisory",
            AdvisoryKind::SevereThunderstorm => "Severe Thunderstorm Watch",
            AdvisoryKind::Flood => "Flood Warning",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AdvisoryKind::Heat => "Heat index values up to 105 expected from 12 PM to 8 PM.",
            AdvisoryKind::SevereThunderstorm => {
                "Conditions are favorable for the development of severe thunderstorms."
            }
            AdvisoryKind::Flood => "Heavy rainfall may cause flooding in low-lying areas.",
        }
    }

    pub fn severity(&self) -> AdvisorySeverity {
        match self {
            AdvisoryKind::Heat => AdvisorySeverity::Warning,
            AdvisoryKind::SevereThunderstorm | AdvisoryKind::Flood => AdvisorySeverity::Danger,
        }
    }

    /// How long the advisory stays in effect
    pub fn duration_hours(&self) -> i64 {
        match self {
            AdvisoryKind::Heat => 8,
            AdvisoryKind::SevereThunderstorm => 6,
            AdvisoryKind::Flood => 12,
        }
    }

    fn advisory_from(self, observed_at: i64) -> Advisory {
        Advisory {
            kind: self,
            title: self.title().to_string(),
            description: self.description().to_string(),
            severity: self.severity(),
            effective_from: observed_at,
            effective_until: observed_at + self.duration_hours() * HOUR_SECONDS,
        }
    }
}

/// Classify current conditions; `None` when no rule applies.
///
/// Thresholds are in Fahrenheit, metric readings are converted first.
pub fn classify(conditions: &CurrentConditions) -> Option<Advisory> {
    let temp_f = to_fahrenheit(conditions.temp, conditions.units);

    let kind = if temp_f > HEAT_ADVISORY_THRESHOLD_F {
        AdvisoryKind::Heat
    } else if conditions.humidity_percent > THUNDERSTORM_HUMIDITY_THRESHOLD {
        AdvisoryKind::SevereThunderstorm
    } else if conditions.condition.main.to_lowercase().contains("rain") {
        AdvisoryKind::Flood
    } else {
        return None;
    };

    Some(kind.advisory_from(conditions.observed_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;
    use crate::types::UnitSystem;

    fn conditions(temp: f64, humidity: i32, main: &str, units: UnitSystem) -> CurrentConditions {
        CurrentConditions {
            location_name: "New York".to_string(),
            country: "US".to_string(),
            observed_at: 1_719_846_300,
            temp,
            feels_like: temp,
            humidity_percent: humidity,
            pressure_hpa: 1015,
            wind_speed: 5.0,
            wind_deg: None,
            visibility_meters: None,
            condition: Condition {
                code: 800,
                main: main.to_string(),
                text: main.to_lowercase(),
                icon: "01d".to_string(),
            },
            sunrise: None,
            sunset: None,
            timezone_offset_seconds: -14400,
            units,
        }
    }

    #[test]
    fn test_heat_threshold_is_exclusive() {
        assert!(classify(&conditions(85.0, 40, "Clear", UnitSystem::Imperial)).is_none());

        let advisory = classify(&conditions(85.1, 40, "Clear", UnitSystem::Imperial)).unwrap();
        assert_eq!(advisory.kind, AdvisoryKind::Heat);
        assert_eq!(advisory.severity, AdvisorySeverity::Warning);
        assert_eq!(advisory.effective_until - advisory.effective_from, 8 * 3600);
    }

    #[test]
    fn test_metric_temperature_converted() {
        // 30°C is 86°F
        let advisory = classify(&conditions(30.0, 40, "Clear", UnitSystem::Metric)).unwrap();
        assert_eq!(advisory.kind, AdvisoryKind::Heat);

        assert!(classify(&conditions(29.0, 40, "Clear", UnitSystem::Metric)).is_none());
    }

    #[test]
    fn test_heat_takes_precedence() {
        let advisory = classify(&conditions(95.0, 90, "Rain", UnitSystem::Imperial)).unwrap();
        assert_eq!(advisory.kind, AdvisoryKind::Heat);
    }

    #[test]
    fn test_humidity_watch() {
        assert!(classify(&conditions(70.0, 85, "Clear", UnitSystem::Imperial)).is_none());

        let advisory = classify(&conditions(70.0, 86, "Rain", UnitSystem::Imperial)).unwrap();
        assert_eq!(advisory.kind, AdvisoryKind::SevereThunderstorm);
        assert_eq!(advisory.severity, AdvisorySeverity::Danger);
        assert_eq!(advisory.title, "Severe Thunderstorm Watch");
    }

    #[test]
    fn test_rain_flood_warning() {
        let advisory = classify(&conditions(60.0, 70, "Rain", UnitSystem::Imperial)).unwrap();
        assert_eq!(advisory.kind, AdvisoryKind::Flood);
        assert_eq!(advisory.effective_until - advisory.effective_from, 12 * 3600);

        let drizzle_rain = classify(&conditions(60.0, 70, "Freezing RAIN", UnitSystem::Imperial));
        assert!(drizzle_rain.is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let advisory = classify(&conditions(90.0, 40, "Clear", UnitSystem::Imperial)).unwrap();
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "heat");
        assert_eq!(json["effectiveFrom"], 1_719_846_300);
    }
}
