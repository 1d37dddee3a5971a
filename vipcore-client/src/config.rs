//! Connector configuration with validation and environment variable support.

use crate::transport::TimingLogLevel;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use vipcore_common::{HttpConfig, RetryConfig};

/// Default cache age in hours.
pub const DEFAULT_CACHE_AGE_HOURS: u64 = 8;

const SECONDS_PER_HOUR: u64 = 3600;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl {
        /// Setting that holds the URL
        field: String,
        /// Parse failure description
        reason: String,
    },

    /// Missing required field
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Environment variable parse error
    #[error("Failed to parse environment variable {name}: {reason}")]
    ParseError {
        /// Variable name
        name: String,
        /// Parse failure description
        reason: String,
    },
}

/// vip-core connector configuration.
#[derive(Debug, Clone)]
pub struct VipCoreConfig {
    /// Base URL of the vip-core service
    pub base_url: Url,
    /// How long results stay cached; zero disables caching
    pub cache_ttl: Duration,
    /// Level of the per-call timing event
    pub timing_log_level: TimingLogLevel,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Retry settings
    pub retry: RetryConfig,
}

impl VipCoreConfig {
    /// Create a configuration for the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        parse_url("base_url", base_url).map(Self::from_url)
    }

    fn from_url(base_url: Url) -> Self {
        Self {
            base_url,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_AGE_HOURS * SECONDS_PER_HOUR),
            timing_log_level: TimingLogLevel::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Loads configuration from environment variables, reading `.env` first.
    ///
    /// - `VIPCORE_SERVICE_URL` (required)
    /// - `VIPCORE_CACHE_AGE` in hours (default 8, 0 disables caching)
    /// - `VIPCORE_SERVICE_TIMING_LOG_LEVEL` (default `INFO`)
    /// - `VIPCORE_REQUEST_TIMEOUT` in seconds (default 30)
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`VipCoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("VIPCORE_SERVICE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("VIPCORE_SERVICE_URL".to_string()))?;

        let cache_age = parse_var(&lookup, "VIPCORE_CACHE_AGE", DEFAULT_CACHE_AGE_HOURS)?;
        let level = parse_var(&lookup, "VIPCORE_SERVICE_TIMING_LOG_LEVEL", TimingLogLevel::Info)?;
        let timeout = parse_var(&lookup, "VIPCORE_REQUEST_TIMEOUT", 30_u64)?;

        let base_url = parse_url("VIPCORE_SERVICE_URL", &base_url)?;
        Ok(Self::from_url(base_url)
            .with_cache_age_hours(cache_age)
            .with_timing_log_level(level)
            .with_http(
                HttpConfig::default().with_request_timeout(Duration::from_secs(timeout)),
            ))
    }

    /// Set the cache TTL.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the cache TTL in whole hours.
    #[must_use]
    pub const fn with_cache_age_hours(mut self, hours: u64) -> Self {
        self.cache_ttl = Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR));
        self
    }

    /// Set the timing log level.
    #[must_use]
    pub const fn with_timing_log_level(mut self, level: TimingLogLevel) -> Self {
        self.timing_log_level = level;
        self
    }

    /// Set the HTTP client settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Set the retry settings.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            field: field.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
