//! Common types used across the dashboard

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit system requested from the upstream provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Value of the provider's `units` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "°F",
            UnitSystem::Metric => "°C",
        }
    }

    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "mph",
            UnitSystem::Metric => "m/s",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Imperial => UnitSystem::Metric,
            UnitSystem::Metric => UnitSystem::Imperial,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown unit system '{0}', expected 'imperial' or 'metric'")]
pub struct ParseUnitSystemError(pub String);

impl FromStr for UnitSystem {
    type Err = ParseUnitSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" => Ok(UnitSystem::Metric),
            _ => Err(ParseUnitSystemError(s.to_string())),
        }
    }
}

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Weather map overlay served by the tile endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MapLayer {
    #[serde(rename = "precipitation_new")]
    Precipitation,
    #[serde(rename = "temp_new")]
    Temperature,
    #[serde(rename = "clouds_new")]
    Clouds,
}

impl MapLayer {
    pub const ALL: [MapLayer; 3] = [MapLayer::Precipitation, MapLayer::Temperature, MapLayer::Clouds];

    /// Layer name in the provider's tile URL template
    pub fn tile_name(&self) -> &'static str {
        match self {
            MapLayer::Precipitation => "precipitation_new",
            MapLayer::Temperature => "temp_new",
            MapLayer::Clouds => "clouds_new",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown map layer '{0}'")]
pub struct ParseMapLayerError(pub String);

impl FromStr for MapLayer {
    type Err = ParseMapLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapLayer::ALL
            .into_iter()
            .find(|layer| layer.tile_name() == s)
            .ok_or_else(|| ParseMapLayerError(s.to_string()))
    }
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileCoordinate {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}
