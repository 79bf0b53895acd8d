//! HTTP handlers

pub mod auth;
pub mod health;
pub mod location;
pub mod locations;
pub mod map;
pub mod query;
pub mod subscriptions;
pub mod weather;

pub use auth::{get_user, login, logout, register};
pub use health::health_check;
pub use location::{default_location, reverse_location, search_locations};
pub use locations::{create_location, delete_location, get_location_weather, list_locations};
pub use map::get_map_tile;
pub use subscriptions::{create_alert, delete_alert, list_alerts, update_alert};
pub use weather::{
    get_current_weather, get_daily_forecast, get_dashboard, get_forecast, get_weather_alerts,
};
