//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use pricing_repo::provider::DEFAULT_PROVIDER_URL;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub provider_url: String,
    pub provider_access_key: Option<String>,
    pub upstream_timeout: Duration,
    pub rate_limit_per_minute: u32,
    /// Serve the reference table instead of calling the provider.
    pub offline: bool,
    pub json_logs: bool,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: parse_or(&get, "PORT", 3000)?,
            provider_url: non_empty("RATES_PROVIDER_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            provider_access_key: non_empty("RATES_PROVIDER_ACCESS_KEY"),
            upstream_timeout: Duration::from_secs(parse_or(&get, "UPSTREAM_TIMEOUT_SECS", 10)?),
            rate_limit_per_minute: parse_or(&get, "RATE_LIMIT_PER_MINUTE", 100)?,
            offline: parse_or(&get, "RATES_OFFLINE", false)?,
            json_logs: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}
