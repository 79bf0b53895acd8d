//! Weather Dashboard - Backend Server

use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weather_server::storage::{MemoryStorage, PgStorage, Storage};
use weather_server::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "weather_server=debug,tower_http=debug,sqlx=warn".into());
    let json_logs = std::env::var("LOG_FORMAT").map_or(false, |f| f == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = Config::load()?;

    tracing::info!("Starting Weather Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    if config.uses_development_secret() && !config.is_development() {
        tracing::warn!("Session secret is the development default; set WXDASH__SESSION__SECRET");
    }
    if config.weather.api_key.is_none() {
        tracing::warn!("OpenWeather API key is not set; weather requests will fail");
    }

    let storage: Arc<dyn Storage> = match &config.database.url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;
            tracing::info!("Database connection established");

            // Run migrations in development
            if config.is_development() {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Migrations completed");
            }

            Arc::new(PgStorage::new(pool))
        }
        None => {
            tracing::warn!("No database URL configured; using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = AppState::new(storage, config)?;

    // Build application
    let app = create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
