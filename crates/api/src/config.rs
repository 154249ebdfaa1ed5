use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use countryfx_db::DEFAULT_MAX_CONNECTIONS;
use countryfx_sources::client::{DEFAULT_COUNTRIES_URL, DEFAULT_RATES_URL, DEFAULT_TIMEOUT_SECS};
use countryfx_sources::SourceConfig;

/// Default location of the rendered summary image.
pub const DEFAULT_SUMMARY_IMAGE_PATH: &str = "cache/summary.png";

/// Configuration value that could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upstream endpoints and outbound timeout.
    pub sources: SourceConfig,
    /// Where the refresh writes the summary PNG.
    pub summary_image_path: PathBuf,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                         |
    /// |----------------------------|---------------------------------|
    /// | `HOST`                     | `0.0.0.0`                       |
    /// | `PORT`                     | `3000`                          |
    /// | `DATABASE_URL`             | required                        |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                            |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                            |
    /// | `SOURCE_TIMEOUT_SECS`      | `10`                            |
    /// | `COUNTRIES_API_URL`        | restcountries v2 `all` endpoint |
    /// | `EXCHANGE_RATE_API_URL`    | open.er-api USD endpoint        |
    /// | `SUMMARY_IMAGE_PATH`       | `cache/summary.png`             |
    /// | `LOG_FORMAT`               | `pretty`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 3000u16)?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections =
            parse_or(&var, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                message: format!("'{origin}': {e}"),
            })?;
        }

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let source_timeout_secs = parse_or(&var, "SOURCE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        let sources = SourceConfig {
            countries_url: var("COUNTRIES_API_URL").unwrap_or_else(|| DEFAULT_COUNTRIES_URL.into()),
            rates_url: var("EXCHANGE_RATE_API_URL").unwrap_or_else(|| DEFAULT_RATES_URL.into()),
            timeout: Duration::from_secs(source_timeout_secs),
        };

        let summary_image_path = var("SUMMARY_IMAGE_PATH")
            .unwrap_or_else(|| DEFAULT_SUMMARY_IMAGE_PATH.into())
            .into();

        let log_format = parse_or(&var, "LOG_FORMAT", LogFormat::Pretty)?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            cors_origins,
            request_timeout_secs,
            sources,
            summary_image_path,
            log_format,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            message: e.to_string(),
        }),
    }
}
