//! Location models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_latitude_str, validate_longitude_str};

/// Canonical place the dashboard renders weather for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Location {
    /// "City, State, CC" style label
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() && state != &self.name => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// A location bookmarked by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLocation {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    /// Decimal degrees, string encoded
    pub lat: String,
    /// Decimal degrees, string encoded
    pub lon: String,
    pub created_at: DateTime<Utc>,
}

/// Input for saving a location
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedLocation {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,
    #[validate(custom = "validate_latitude_str")]
    pub lat: String,
    #[validate(custom = "validate_longitude_str")]
    pub lon: String,
}
