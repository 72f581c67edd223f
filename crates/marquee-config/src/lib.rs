//! # Marquee Config
//!
//! Typed configuration for the Marquee service, loaded from the process
//! environment (with `.env` support via dotenvy).
//!
//! | Variable             | Default                         | Meaning                       |
//! |----------------------|---------------------------------|-------------------------------|
//! | `MARQUEE_HTTP_ADDR`  | `127.0.0.1:3000`                | Bind address                  |
//! | `MARQUEE_DB_PATH`    | `/tmp/marquee.db`               | SQLite database file          |
//! | `MARQUEE_TMDB_URL`   | `https://api.themoviedb.org/3`  | Metadata API base URL         |
//! | `MARQUEE_TMDB_KEY`   | (required)                    | Metadata API bearer key       |
//! | `MARQUEE_LOG`        | `info`                          | Log filter                    |
//! | `MARQUEE_LOG_JSON`   | `true`                          | JSON log output               |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {variable}: {detail}")]
    Invalid {
        /// The offending variable name.
        variable: &'static str,
        /// What went wrong.
        detail: String,
    },
}

/// The service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub http_addr: String,
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Base URL of the movie metadata API.
    pub tmdb_base_url: String,
    /// Bearer key for the movie metadata API.
    pub tmdb_api_key: String,
    /// Log filter directive (e.g. `info`, `marquee=debug`).
    pub log_filter: String,
    /// Whether logs are emitted as JSON.
    pub log_json: bool,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env files are fine; a malformed one is not silently
        // ignored here either, it simply stops at the bad line.
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_addr: env_or("MARQUEE_HTTP_ADDR", "127.0.0.1:3000"),
            db_path: env_or("MARQUEE_DB_PATH", "/tmp/marquee.db"),
            tmdb_base_url: env_or("MARQUEE_TMDB_URL", "https://api.themoviedb.org/3"),
            tmdb_api_key: std::env::var("MARQUEE_TMDB_KEY")
                .map_err(|_| ConfigError::Missing("MARQUEE_TMDB_KEY"))?,
            log_filter: env_or("MARQUEE_LOG", "info"),
            log_json: env_bool("MARQUEE_LOG_JSON", true)?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::Invalid {
                variable: name,
                detail: format!("expected true/false, got '{other}'"),
            }),
        },
    }
}
