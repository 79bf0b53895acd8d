//! Configuration management for the Weather Dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WXDASH_ prefix
//!
//! The upstream credential may also come from the legacy
//! `OPENWEATHER_API_KEY` variable. Its absence is not an error here; the
//! weather gateway reports it when an operation is invoked.

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DayBucketing;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub session: SessionConfig,

    /// Upstream weather provider
    pub weather: WeatherConfig,

    /// Location used when no other can be resolved
    pub default_location: DefaultLocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; in-memory storage is used when unset
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Secret for signing session tokens
    pub secret: String,

    /// Session lifetime in seconds
    pub ttl_seconds: i64,

    /// Name of the session cookie
    pub cookie_name: String,

    /// Mark the cookie `Secure`
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Provider credential
    pub api_key: Option<String>,

    /// Base for `/data/2.5/*`
    pub api_base: String,

    /// Base for `/geo/1.0/*`
    pub geo_base: String,

    /// Base for `/map/{layer}/{z}/{x}/{y}.png`
    pub tile_base: String,

    /// Per-request timeout
    pub timeout_seconds: u64,

    /// Calendar used to bucket forecast points into days
    pub day_bucketing: DayBucketing,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DefaultLocationConfig {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

const DEVELOPMENT_SESSION_SECRET: &str = "weather-dashboard-development-secret";

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WXDASH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("session.secret", DEVELOPMENT_SESSION_SECRET)?
            .set_default("session.ttl_seconds", 7 * 24 * 60 * 60)?
            .set_default("session.cookie_name", "session")?
            .set_default("session.secure", false)?
            .set_default("weather.api_base", "https://api.openweathermap.org")?
            .set_default("weather.geo_base", "https://api.openweathermap.org")?
            .set_default("weather.tile_base", "https://tile.openweathermap.org")?
            .set_default("weather.timeout_seconds", 5)?
            .set_default("weather.day_bucketing", "server_local")?
            .set_default("default_location.name", "New York")?
            .set_default("default_location.country", "US")?
            .set_default("default_location.state", "New York")?
            .set_default("default_location.lat", 40.7128)?
            .set_default("default_location.lon", -74.0060)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WXDASH_ prefix)
            .add_source(
                Environment::with_prefix("WXDASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        config.apply_legacy_env();
        Ok(config)
    }

    /// Fill gaps from the variable names the dashboard used before the
    /// prefixed scheme
    fn apply_legacy_env(&mut self) {
        let legacy = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            self.weather.api_key = legacy("OPENWEATHER_API_KEY");
        }
        if self.database.url.is_none() {
            self.database.url = legacy("DATABASE_URL");
        }
        if self.session.secret == DEVELOPMENT_SESSION_SECRET {
            if let Some(secret) = legacy("SESSION_SECRET") {
                self.session.secret = secret;
            }
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether the signing secret is still the built-in development value
    pub fn uses_development_secret(&self) -> bool {
        self.session.secret == DEVELOPMENT_SESSION_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                min_connections: 1,
            },
            session: SessionConfig {
                secret: DEVELOPMENT_SESSION_SECRET.to_string(),
                ttl_seconds: 7 * 24 * 60 * 60,
                cookie_name: "session".to_string(),
                secure: false,
            },
            weather: WeatherConfig::default(),
            default_location: DefaultLocationConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openweathermap.org".to_string(),
            geo_base: "https://api.openweathermap.org".to_string(),
            tile_base: "https://tile.openweathermap.org".to_string(),
            timeout_seconds: 5,
            day_bucketing: DayBucketing::ServerLocal,
        }
    }
}

impl Default for DefaultLocationConfig {
    fn default() -> Self {
        Self {
            name: "New York".to_string(),
            country: "US".to_string(),
            state: Some("New York".to_string()),
            lat: 40.7128,
            lon: -74.0060,
        }
    }
}
