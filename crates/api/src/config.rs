//! # API Configuration Module
//!
//! Loads the server and scheduling settings from environment variables,
//! with defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SCHEDULE_WINDOW_START` / `SCHEDULE_WINDOW_END`: Window scanned for
//!   start times, as `HH:MM` (default: 08:00 to 20:00)
//! - `SCHEDULE_ALTERNATIVE_DAYS`: Days searched for alternatives (default: 7)
//! - `SCHEDULE_MAX_ALTERNATIVES`: Alternatives per specialty (default: 5)
//! - `SCHEDULE_COMMIT_ATTEMPTS`: Attempts per mutation on conflict (default: 3)

use chrono::NaiveTime;
use eyre::{Result, WrapErr};
use slotwise_core::config::SchedulingConfig;
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Configuration for the Slotwise API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotwise_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Engine tunables
    pub scheduling: SchedulingConfig,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - A scheduling variable is set but cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            scheduling: scheduling_from_env()?,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .wrap_err_with(|| format!("Invalid time of day: {}", value))
}

fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .wrap_err_with(|| format!("Invalid {} value", name)),
        Err(_) => Ok(None),
    }
}

fn scheduling_from_env() -> Result<SchedulingConfig> {
    let defaults = SchedulingConfig::default();

    let window_start = match env::var("SCHEDULE_WINDOW_START") {
        Ok(value) => parse_clock_time(&value)?,
        Err(_) => defaults.window_start,
    };
    let window_end = match env::var("SCHEDULE_WINDOW_END") {
        Ok(value) => parse_clock_time(&value)?,
        Err(_) => defaults.window_end,
    };
    if window_end <= window_start {
        eyre::bail!("SCHEDULE_WINDOW_END must be after SCHEDULE_WINDOW_START");
    }

    Ok(SchedulingConfig {
        window_start,
        window_end,
        alternative_days: optional_var("SCHEDULE_ALTERNATIVE_DAYS")?.unwrap_or(defaults.alternative_days),
        max_alternatives: optional_var("SCHEDULE_MAX_ALTERNATIVES")?.unwrap_or(defaults.max_alternatives),
        max_commit_attempts: optional_var("SCHEDULE_COMMIT_ATTEMPTS")?.unwrap_or(defaults.max_commit_attempts),
    })
}
