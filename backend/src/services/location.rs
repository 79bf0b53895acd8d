//! Location resolution
//!
//! Turns a search string, device coordinates or a saved record into the
//! [`Location`] the dashboard renders. Resolution from coordinates never
//! yields a nameless place: when reverse geocoding has nothing, the
//! default location's name is used with the caller's coordinates.

use shared::validation::{parse_latitude, parse_longitude, validate_latitude, validate_longitude};
use shared::{Coordinates, Location, SavedLocation};

use crate::config::DefaultLocationConfig;
use crate::error::{AppError, AppResult};
use crate::external::WeatherGateway;

#[derive(Clone)]
pub struct LocationResolver {
    gateway: WeatherGateway,
    default: Location,
}

impl From<&DefaultLocationConfig> for Location {
    fn from(config: &DefaultLocationConfig) -> Self {
        Location {
            name: config.name.clone(),
            lat: config.lat,
            lon: config.lon,
            country: config.country.clone(),
            state: config.state.clone(),
        }
    }
}

impl LocationResolver {
    pub fn new(gateway: WeatherGateway, default: &DefaultLocationConfig) -> Self {
        Self {
            gateway,
            default: default.into(),
        }
    }

    /// Candidates for a free-text query, provider ranked
    pub async fn from_search(&self, query: &str) -> AppResult<Vec<Location>> {
        self.gateway.search_locations(query).await
    }

    /// Best candidate for a free-text query
    pub async fn first_match(&self, query: &str) -> AppResult<Location> {
        self.from_search(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    /// Name the place at the given coordinates
    pub async fn from_coordinates(&self, lat: f64, lon: f64) -> AppResult<Location> {
        check_coordinates(lat, lon)?;

        let resolved = self.gateway.reverse_geocode(lat, lon).await.into_iter().next();

        Ok(match resolved {
            Some(place) => Location {
                // Keep the device's coordinates rather than the place centroid
                lat,
                lon,
                ..place
            },
            None => Location {
                name: self.default.name.clone(),
                country: self.default.country.clone(),
                state: None,
                lat,
                lon,
            },
        })
    }

    /// Location for a saved record; no network access
    pub fn from_saved(&self, saved: &SavedLocation) -> AppResult<Location> {
        let lat = parse_latitude(&saved.lat).map_err(|e| AppError::InvalidRequest(e.into()))?;
        let lon = parse_longitude(&saved.lon).map_err(|e| AppError::InvalidRequest(e.into()))?;

        Ok(Location {
            name: saved.city.clone(),
            lat,
            lon,
            country: saved.country.clone(),
            state: None,
        })
    }

    /// The configured default city
    pub fn fallback(&self) -> Location {
        self.default.clone()
    }

    /// Resolve the device position; `None` when geolocation was denied,
    /// unsupported or failed
    pub async fn from_device(&self, position: Option<Coordinates>) -> AppResult<Location> {
        match position {
            Some(Coordinates { lat, lon }) => self.from_coordinates(lat, lon).await,
            None => Ok(self.fallback()),
        }
    }
}

/// Range-check coordinates, naming the offending field
pub fn check_coordinates(lat: f64, lon: f64) -> AppResult<()> {
    validate_latitude(lat).map_err(|e| AppError::validation("lat", e))?;
    validate_longitude(lon).map_err(|e| AppError::validation("lon", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resolver() -> LocationResolver {
        // No credential: reverse geocoding soft-fails without a request
        let gateway = WeatherGateway::with_base_url(None, "http://127.0.0.1:9").unwrap();
        LocationResolver::new(gateway, &DefaultLocationConfig::default())
    }

    #[test]
    fn test_fallback_is_new_york() {
        let fallback = resolver().fallback();
        assert_eq!(fallback.name, "New York");
        assert_eq!(fallback.country, "US");
        assert_eq!(fallback.state.as_deref(), Some("New York"));
        assert_eq!((fallback.lat, fallback.lon), (40.7128, -74.0060));
    }

    #[tokio::test]
    async fn test_device_denied_uses_fallback() {
        let location = resolver().from_device(None).await.unwrap();
        assert_eq!(location.name, "New York");
    }

    #[tokio::test]
    async fn test_unnamed_coordinates_keep_position() {
        let location = resolver().from_coordinates(51.5074, -0.1278).await.unwrap();
        assert_eq!(location.name, "New York");
        assert_eq!(location.lat, 51.5074);
        assert_eq!(location.lon, -0.1278);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates() {
        let err = resolver().from_coordinates(95.0, 0.0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lat"));
    }

    #[test]
    fn test_from_saved_parses_decimal_strings() {
        let saved = SavedLocation {
            id: 1,
            user_id: 1,
            name: "Home".to_string(),
            city: "Chicago".to_string(),
            country: "US".to_string(),
            lat: "41.8781".to_string(),
            lon: "-87.6298".to_string(),
            created_at: Utc::now(),
        };
        let location = resolver().from_saved(&saved).unwrap();
        assert_eq!(location.name, "Chicago");
        assert_eq!(location.lat, 41.8781);

        let broken = SavedLocation {
            lat: "north".to_string(),
            ..saved
        };
        assert!(matches!(
            resolver().from_saved(&broken),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
