//! Upstream exchange-rate provider adapter (exchangerate.host compatible).
//!
//! `GET {base_url}/latest?base=USD&symbols=USD,PHP,JPY,CAD,EUR`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use exchange_rates::{BASE_CURRENCY, symbols_param};
use pricing_types::{RateFetchError, RateSource, RateTable};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.exchangerate.host";

/// Provider connection settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub access_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            access_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    error: Option<ProviderErrorBody>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

/// Rate source that calls the provider directly.
pub struct ExchangeRateHostSource {
    config: ProviderConfig,
    http: Client,
}

impl ExchangeRateHostSource {
    /// Fails when the HTTP client cannot be built with the configured timeout.
    pub fn new(config: ProviderConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config: ProviderConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            http,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn latest_url(&self) -> String {
        format!("{}/latest", self.config.base_url)
    }
}

#[async_trait]
impl RateSource for ExchangeRateHostSource {
    #[tracing::instrument(skip(self), fields(provider = %self.config.base_url))]
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
        let mut query = vec![
            ("base", BASE_CURRENCY.code().to_string()),
            ("symbols", symbols_param()),
        ];
        if let Some(key) = &self.config.access_key {
            query.push(("access_key", key.clone()));
        }

        let resp = self
            .http
            .get(self.latest_url())
            .query(&query)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RateFetchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout))?;
        let table = parse_latest(&body)?;
        tracing::debug!(entries = table.len(), as_of = ?table.as_of(), "Fetched provider rates");
        Ok(table)
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> RateFetchError {
    if err.is_timeout() {
        RateFetchError::Timeout(timeout)
    } else {
        RateFetchError::Network(err.to_string())
    }
}

/// Interprets a `latest` body. The provider signals failure in-band with
/// `success: false`, so a 200 status alone is not enough.
pub(crate) fn parse_latest(body: &str) -> Result<RateTable, RateFetchError> {
    let data: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| RateFetchError::Malformed(e.to_string()))?;

    if data.success != Some(true) {
        let reason = data
            .error
            .and_then(|e| e.info.or(e.kind))
            .unwrap_or_else(|| "Failed to fetch exchange rates from API".to_string());
        return Err(RateFetchError::Provider(reason));
    }

    let rates = data
        .rates
        .ok_or_else(|| RateFetchError::Malformed("missing `rates`".into()))?;
    let as_of = data.date.or_else(|| data.timestamp.map(|t| t.to_string()));

    Ok(RateTable::from_raw(rates, as_of))
}
