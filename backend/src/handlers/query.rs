//! Query string parameters shared by the weather and location handlers

use serde::Deserialize;

use shared::validation::{parse_latitude, parse_longitude};
use shared::{UnitSystem, DEFAULT_FORECAST_DAYS};

use crate::error::{AppError, AppResult};

/// `?lat&lon&units&days`, kept as raw strings so a missing value and a
/// malformed one produce different errors
#[derive(Debug, Default, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
    pub days: Option<String>,
}

impl CoordinatesQuery {
    /// Both coordinates, parsed and range-checked
    pub fn coordinates(&self) -> AppResult<(f64, f64)> {
        match self.try_coordinates()? {
            Some(coordinates) => Ok(coordinates),
            None => Err(AppError::InvalidRequest(
                "Latitude and longitude are required".to_string(),
            )),
        }
    }

    /// Coordinates when both were supplied; `None` when neither was
    pub fn try_coordinates(&self) -> AppResult<Option<(f64, f64)>> {
        let (lat, lon) = match (non_blank(&self.lat), non_blank(&self.lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, None) => return Ok(None),
            _ => {
                return Err(AppError::InvalidRequest(
                    "Latitude and longitude are required".to_string(),
                ))
            }
        };

        let lat = parse_latitude(lat).map_err(|e| AppError::validation("lat", e))?;
        let lon = parse_longitude(lon).map_err(|e| AppError::validation("lon", e))?;
        Ok(Some((lat, lon)))
    }

    /// Requested unit system, imperial when absent
    pub fn units(&self) -> AppResult<UnitSystem> {
        match non_blank(&self.units) {
            Some(units) => units
                .parse()
                .map_err(|e: shared::ParseUnitSystemError| AppError::InvalidRequest(e.to_string())),
            None => Ok(UnitSystem::default()),
        }
    }

    /// Number of day summaries, at least one
    pub fn days(&self) -> AppResult<usize> {
        match non_blank(&self.days) {
            Some(days) => days
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| AppError::validation("days", "Days must be a positive integer")),
            None => Ok(DEFAULT_FORECAST_DAYS),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric path id, naming the resource in the error
pub fn parse_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} ID", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<&str>, lon: Option<&str>) -> CoordinatesQuery {
        CoordinatesQuery {
            lat: lat.map(String::from),
            lon: lon.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_coordinates() {
        let err = query(None, Some("-74.0")).coordinates().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Latitude and longitude are required"));

        assert!(query(None, None).try_coordinates().unwrap().is_none());
        assert!(query(Some(" "), None).coordinates().is_err());
    }

    #[test]
    fn test_malformed_coordinates_name_field() {
        let err = query(Some("40.7"), Some("east")).coordinates().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lon"));

        let err = query(Some("91"), Some("0")).coordinates().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lat"));

        assert_eq!(
            query(Some("40.7128"), Some("-74.0060")).coordinates().unwrap(),
            (40.7128, -74.0060)
        );
    }

    #[test]
    fn test_units_and_days() {
        let mut q = CoordinatesQuery::default();
        assert_eq!(q.units().unwrap(), UnitSystem::Imperial);
        assert_eq!(q.days().unwrap(), DEFAULT_FORECAST_DAYS);

        q.units = Some("metric".to_string());
        q.days = Some("3".to_string());
        assert_eq!(q.units().unwrap(), UnitSystem::Metric);
        assert_eq!(q.days().unwrap(), 3);

        q.units = Some("kelvin".to_string());
        q.days = Some("0".to_string());
        assert!(matches!(q.units(), Err(AppError::InvalidRequest(_))));
        assert!(matches!(q.days(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "location").unwrap(), 42);
        let err = parse_id("abc", "location").unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m == "Invalid location ID"));
    }
}
