use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::websocket::rate_limiter::RateLimiter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Phrase catalog to load instead of the built-in one.
    pub phrases_path: Option<PathBuf>,
    pub rate_limit_burst: u32,
    pub rate_limit_refill: Duration,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: parse_var(&lookup, "HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            phrases_path: lookup("PHRASES_PATH")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            rate_limit_burst: parse_var(&lookup, "RATE_LIMIT_BURST")?
                .unwrap_or(defaults.rate_limit_burst),
            rate_limit_refill: parse_var(&lookup, "RATE_LIMIT_REFILL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.rate_limit_refill),
        })
    }

    /// A fresh bucket for one connection.
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new_with_limits(self.rate_limit_burst, self.rate_limit_refill)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            phrases_path: None,
            rate_limit_burst: 30,
            rate_limit_refill: Duration::from_secs(2),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}
