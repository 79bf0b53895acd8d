//! Validation utilities for coordinates, search queries and map tiles

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;
use validator::ValidationError;

use crate::types::TileCoordinate;

/// Deepest zoom level the tile provider serves
pub const MAX_TILE_ZOOM: u8 = 19;

// ============================================================================
// Coordinates
// ============================================================================

/// Validate latitude is a finite value in [-90, 90]
pub fn validate_latitude(lat: f64) -> Result<(), &'static str> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is a finite value in [-180, 180]
pub fn validate_longitude(lon: f64) -> Result<(), &'static str> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Parse a string-encoded decimal coordinate
pub fn parse_coordinate(value: &str) -> Result<f64, &'static str> {
    let trimmed = value.trim();
    let decimal = Decimal::from_str(trimmed).map_err(|_| "Coordinate must be a decimal number")?;
    // Prefer the float parse of the literal so "40.7128" round-trips exactly
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| decimal.to_f64())
        .ok_or("Coordinate is out of range")
}

/// Parse and range-check a string-encoded latitude
pub fn parse_latitude(value: &str) -> Result<f64, &'static str> {
    let lat = parse_coordinate(value)?;
    validate_latitude(lat)?;
    Ok(lat)
}

/// Parse and range-check a string-encoded longitude
pub fn parse_longitude(value: &str) -> Result<f64, &'static str> {
    let lon = parse_coordinate(value)?;
    validate_longitude(lon)?;
    Ok(lon)
}

pub fn validate_latitude_str(value: &str) -> Result<(), ValidationError> {
    parse_latitude(value)
        .map(|_| ())
        .map_err(|msg| validation_error("latitude", msg))
}

pub fn validate_longitude_str(value: &str) -> Result<(), ValidationError> {
    parse_longitude(value)
        .map(|_| ())
        .map_err(|msg| validation_error("longitude", msg))
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

// ============================================================================
// Search
// ============================================================================

/// Validate a free-text location query, returning it trimmed
pub fn validate_search_query(query: &str) -> Result<&str, &'static str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("Search query is required");
    }
    Ok(trimmed)
}

// ============================================================================
// Map tiles
// ============================================================================

/// Validate a slippy-map tile address: x and y must be below 2^z
pub fn validate_tile(tile: &TileCoordinate) -> Result<(), &'static str> {
    if tile.z > MAX_TILE_ZOOM {
        return Err("Zoom level must be between 0 and 19");
    }
    let size = 1u32 << tile.z;
    if tile.x >= size || tile.y >= size {
        return Err("Tile coordinates out of range for zoom level");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(40.7128).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(90.0001).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(-74.006).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.5).is_err());
        assert!(validate_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_coordinate_strings() {
        assert_eq!(parse_latitude("40.7128"), Ok(40.7128));
        assert_eq!(parse_longitude(" -74.0060 "), Ok(-74.006));
        assert!(parse_latitude("north").is_err());
        assert!(parse_latitude("").is_err());
        assert!(parse_latitude("91").is_err());
    }

    #[test]
    fn test_search_query() {
        assert_eq!(validate_search_query("  Paris "), Ok("Paris"));
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
    }

    #[test]
    fn test_tile_bounds() {
        assert!(validate_tile(&TileCoordinate { z: 0, x: 0, y: 0 }).is_ok());
        assert!(validate_tile(&TileCoordinate { z: 0, x: 1, y: 0 }).is_err());
        assert!(validate_tile(&TileCoordinate { z: 3, x: 7, y: 7 }).is_ok());
        assert!(validate_tile(&TileCoordinate { z: 3, x: 8, y: 2 }).is_err());
        assert!(validate_tile(&TileCoordinate { z: 20, x: 0, y: 0 }).is_err());
    }
}
