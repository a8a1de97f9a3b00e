use std::{env, str::FromStr, sync::Arc};

use crate::error::{AppError, Res};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to start the storefront service: database
/// connection, JWT verification secret, bind address, CORS origin,
/// logging preferences, rate limits and the Google Places client settings
/// used by the metered reviews add-on.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) verification.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// File the logger appends to.
    pub log_file: String,
    /// Requests per second accepted by the whole server.
    pub global_rate_limit: u32,
    /// Requests per second accepted per client IP on public checkout routes.
    pub client_rate_limit: u32,
    /// Google Places client used by the reviews add-on.
    pub google_places: GooglePlacesConfig,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) verification.
pub struct JwtConfig {
    /// The secret key used to verify HS256 tokens.
    pub secret: String,
}

#[derive(Clone, Debug)]
pub struct GooglePlacesConfig {
    pub api_key: String,
    /// Base URL of the Places API, without a trailing slash.
    pub base_url: String,
}

impl JwtConfig {
    /// Reads `JWT_SECRET`, which is required.
    pub fn from_env() -> Res<Self> {
        dotenvy::dotenv().ok();

        Ok(JwtConfig {
            secret: required("JWT_SECRET")?,
        })
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT verification
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `LOG_FILE`: Log file path (default: "storefront.log")
    /// - `GLOBAL_RATE_LIMIT`: Server-wide requests per second (default: 50)
    /// - `CLIENT_RATE_LIMIT`: Per-IP requests per second on checkout routes (default: 5)
    /// - `GOOGLE_PLACES_API_KEY`, `GOOGLE_PLACES_BASE_URL`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when a required variable is missing or a
    /// numeric value cannot be parsed.
    pub fn from_env() -> Res<Arc<Self>> {
        dotenvy::dotenv().ok();

        Ok(Arc::new(Config {
            environment: required("ENVIRONMENT")?,
            database_url: required("DATABASE_URL")?,
            jwt_config: JwtConfig::from_env()?,
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parsed("PORT", 8080)?,
            num_workers: parsed("WORKERS", 4)?,
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "storefront.log".to_string()),
            global_rate_limit: parsed("GLOBAL_RATE_LIMIT", 50)?,
            client_rate_limit: parsed("CLIENT_RATE_LIMIT", 5)?,
            google_places: GooglePlacesConfig {
                api_key: env::var("GOOGLE_PLACES_API_KEY").unwrap_or_default(),
                base_url: env::var("GOOGLE_PLACES_BASE_URL")
                    .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api/place".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
        }))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required(name: &str) -> Res<String> {
    env::var(name).map_err(|_| AppError::Config(format!("{} must be set", name)))
}

fn parsed<T: FromStr>(name: &str, default: T) -> Res<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", name))),
        Err(_) => Ok(default),
    }
}
