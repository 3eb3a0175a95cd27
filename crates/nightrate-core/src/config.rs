//! Process configuration, read once at construction. No hot reload.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not set")]
    Missing { name: &'static str },
    #[error("{name} is not a valid number: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Settings for the model client, cache, and circuit breaker.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub base_url: String,
    pub token: String,
    /// Bounds both connection establishment and overall completion.
    pub timeout: Duration,
    /// TTL handed to the backing store on write.
    pub cache_ttl: Duration,
    /// Age past which a cache hit still returns but triggers a refresh.
    pub soft_ttl: Duration,
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

impl PricingConfig {
    /// Reference configuration with the given credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_MODEL_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(300),
            soft_ttl: Duration::from_secs(240),
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(10),
        }
    }

    /// Read configuration from `NIGHTRATE_*` environment variables.
    ///
    /// The credential has no default; everything else falls back to the
    /// reference configuration. Duration values are seconds, fractional
    /// allowed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("NIGHTRATE_MODEL_TOKEN").map_err(|_| ConfigError::Missing {
            name: "NIGHTRATE_MODEL_TOKEN",
        })?;

        let mut config = Self::new(token);
        if let Ok(url) = std::env::var("NIGHTRATE_MODEL_URL") {
            config.base_url = url;
        }
        config.timeout = secs_from_env("NIGHTRATE_MODEL_TIMEOUT", config.timeout)?;
        config.cache_ttl = secs_from_env("NIGHTRATE_CACHE_TTL", config.cache_ttl)?;
        config.soft_ttl = secs_from_env("NIGHTRATE_SOFT_TTL", config.soft_ttl)?;
        config.reset_timeout = secs_from_env("NIGHTRATE_CB_RESET_TIMEOUT", config.reset_timeout)?;
        if let Ok(value) = std::env::var("NIGHTRATE_CB_THRESHOLD") {
            config.failure_threshold =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: "NIGHTRATE_CB_THRESHOLD",
                        value: value.clone(),
                    })?;
        }
        Ok(config)
    }
}

fn secs_from_env(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };

    let secs: f64 = value.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.clone(),
    })?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::InvalidNumber { name, value });
    }
    Ok(Duration::from_secs_f64(secs))
}
