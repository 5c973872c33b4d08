//! # Pricing Client SDK
//!
//! A typed Rust client for the `get-exchange-rates` proxy. `RatesClient`
//! also implements `RateSource`, so a storefront session can take its rates
//! through the proxy.

use std::time::Duration;

use async_trait::async_trait;
use pricing_types::{
    CurrencyInfo, ExchangeRatesResponse, RateFetchError, RateSource, RateTable,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exchange-rate proxy client.
pub struct RatesClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http: Client,
}

impl RatesClient {
    /// Creates a new client, e.g. for `https://<project>.functions.example/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Sets the gateway key, sent both as `apikey` and as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks if the proxy is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.request(Method::GET, "/health").send().await?;
        Ok(resp.status().is_success())
    }

    /// Latest USD-based rates as relayed by the proxy.
    pub async fn get_exchange_rates(&self) -> Result<ExchangeRatesResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/get-exchange-rates")
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Currencies the proxy supports.
    pub async fn list_currencies(&self) -> Result<Vec<CurrencyInfo>, ClientError> {
        let resp = self.request(Method::GET, "/currencies").send().await?;
        self.handle_response(resp).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn to_fetch_error(&self, err: ClientError) -> RateFetchError {
        match err {
            ClientError::Http(e) if e.is_timeout() => RateFetchError::Timeout(self.timeout),
            ClientError::Http(e) => RateFetchError::Network(e.to_string()),
            ClientError::Api { status, message } if message.is_empty() => {
                RateFetchError::Status(status)
            }
            ClientError::Api { message, .. } => RateFetchError::Provider(message),
            ClientError::Json(e) => RateFetchError::Malformed(e.to_string()),
        }
    }
}

#[async_trait]
impl RateSource for RatesClient {
    #[tracing::instrument(skip(self), fields(proxy = %self.base_url))]
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
        let response = self
            .get_exchange_rates()
            .await
            .map_err(|e| self.to_fetch_error(e))?;
        Ok(response.into_table())
    }
}
