//! Weather Dashboard - Backend Server
//!
//! Proxies the OpenWeatherMap API, aggregates current conditions, forecast
//! and alerts for the dashboard, and persists saved locations and alert
//! subscriptions behind session authentication.

use axum::Router;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::WeatherGateway;
use storage::Storage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub gateway: WeatherGateway,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from configuration; the gateway's HTTP client is created here
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> AppResult<Self> {
        let gateway = WeatherGateway::new(&config.weather)?;
        Ok(Self::with_gateway(storage, gateway, config))
    }

    pub fn with_gateway(storage: Arc<dyn Storage>, gateway: WeatherGateway, config: Config) -> Self {
        Self {
            storage,
            gateway,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
