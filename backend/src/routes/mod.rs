//! Route definitions for the Weather Dashboard

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{handlers, middleware::session_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .nest(
            "/api",
            Router::new()
                .merge(weather_routes())
                .merge(location_routes())
                .merge(auth_routes())
                .merge(protected_routes(state)),
        )
}

/// Weather routes (public)
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(handlers::get_current_weather))
        .route("/weather/alerts", get(handlers::get_weather_alerts))
        .route("/forecast", get(handlers::get_forecast))
        .route("/forecast/daily", get(handlers::get_daily_forecast))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/map/tiles/:layer/:z/:x/:y", get(handlers::get_map_tile))
}

/// Location lookup routes (public)
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/location/search", get(handlers::search_locations))
        .route("/location/reverse", get(handlers::reverse_location))
        .route("/location/default", get(handlers::default_location))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}

/// Account, saved location and alert subscription routes (protected)
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/user", get(handlers::get_user))
        // Saved locations
        .route(
            "/locations",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route("/locations/:id", delete(handlers::delete_location))
        .route("/locations/:id/weather", get(handlers::get_location_weather))
        // Alert subscriptions
        .route("/alerts", get(handlers::list_alerts).post(handlers::create_alert))
        .route(
            "/alerts/:id",
            patch(handlers::update_alert).delete(handlers::delete_alert),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
}
