//! # Application Configuration Module
//!
//! Loads an immutable configuration snapshot from environment variables at
//! process start. Every variable has a documented fallback default so the
//! application boots in a bare environment.
//!
//! ## Environment Variables
//!
//! | Variable             | Default                 |
//! |----------------------|-------------------------|
//! | `APP_ENV`            | `development`           |
//! | `APP_NAME`           | `Kickstart`             |
//! | `APP_URL`            | `http://localhost:8080` |
//! | `MYSQL_SERVICE_HOST` | `mysql`                 |
//! | `MYSQL_USER`         | `lamp_user`             |
//! | `MYSQL_PASSWORD`     | `lamp_password`         |
//! | `MYSQL_DATABASE`     | `lamp_db`               |
//! | `SESSION_LIFETIME`   | `120` (minutes)         |
//! | `LOG_DIR`            | `storage/logs`          |
//! | `SESSION_DIR`        | `storage/sessions`      |
//!
//! Debug mode is not set directly: it derives from the environment, enabled
//! only when `APP_ENV` is `development`.
//!
//! ## Usage
//!
//! ```rust
//! use kickstart::config::AppConfig;
//!
//! let config = AppConfig::from_env();
//! println!("app: {} ({})", config.app_name, config.environment);
//! ```

use std::env;

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Database server hostname
    pub host: String,
    /// Username for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
    /// Database (schema) name
    pub database: String,
}

/// Immutable application configuration snapshot.
///
/// Load once at startup with [`AppConfig::from_env()`]. Loading is
/// idempotent; calling it again simply produces an equal snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Human-readable application name
    pub app_name: String,
    /// Deployment environment (`development`, `production`, ...)
    pub environment: String,
    /// Debug mode: verbatim error detail in responses
    pub debug: bool,
    /// Public base URL of the application
    pub url: String,
    /// Session lifetime in minutes
    pub session_lifetime_mins: u64,
    /// Directory for daily log files
    pub log_dir: String,
    /// Directory for session files
    pub session_dir: String,
    /// Backing store settings
    pub db: DbConfig,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = env_or("APP_ENV", "development");
        // Debug mode follows the environment, development only
        let debug = environment == "development";

        let session_lifetime_mins = env::var("SESSION_LIFETIME")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);

        AppConfig {
            app_name: env_or("APP_NAME", "Kickstart"),
            debug,
            environment,
            url: env_or("APP_URL", "http://localhost:8080"),
            session_lifetime_mins,
            log_dir: env_or("LOG_DIR", "storage/logs"),
            session_dir: env_or("SESSION_DIR", "storage/sessions"),
            db: DbConfig {
                host: env_or("MYSQL_SERVICE_HOST", "mysql"),
                user: env_or("MYSQL_USER", "lamp_user"),
                password: env_or("MYSQL_PASSWORD", "lamp_password"),
                database: env_or("MYSQL_DATABASE", "lamp_db"),
            },
        }
    }
}
