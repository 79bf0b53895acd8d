//! Alert subscription models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's opt-in to a kind of alert for one of their saved locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSubscription {
    pub id: i64,
    pub user_id: i64,
    pub location_id: i64,
    pub alert_type: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an alert subscription
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAlertSubscription {
    pub location_id: i64,
    #[validate(length(min = 1, max = 50, message = "Alert type is required"))]
    pub alert_type: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
