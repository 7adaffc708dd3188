use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication configuration
    pub jwt_secret: String,

    // Frontend URLs
    pub frontend_url: String,

    // Content settings
    pub default_articles_per_page: usize,
    pub excerpt_length: usize,

    // Station stream
    pub station_name: String,
    pub stream_url: String,
    pub stream_status_url: String,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/onair".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),

            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),

            default_articles_per_page: env::var("DEFAULT_ARTICLES_PER_PAGE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            excerpt_length: env::var("EXCERPT_LENGTH")
                .unwrap_or_else(|_| "200".to_string())
                .parse()?,

            station_name: env::var("STATION_NAME")
                .unwrap_or_else(|_| "OnAir Station".to_string()),
            stream_url: env::var("STREAM_URL")
                .unwrap_or_else(|_| "http://localhost:8000/live".to_string()),
            stream_status_url: env::var("STREAM_STATUS_URL")
                .unwrap_or_else(|_| "http://localhost:8000/status-json.xsl".to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
