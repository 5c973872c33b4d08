//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use exchange_rates::CurrencyCode;
use pricing_types::dto::{CurrencyInfo, ErrorResponse, ExchangeRatesResponse};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Supported display currencies
#[utoipa::path(
    get,
    path = "/currencies",
    tag = "currencies",
    responses(
        (status = 200, description = "Currencies in catalog order", body = Vec<CurrencyInfo>)
    )
)]
async fn list_currencies() {}

/// Latest USD-based exchange rates
#[utoipa::path(
    get,
    path = "/get-exchange-rates",
    tag = "rates",
    responses(
        (status = 200, description = "Rates relayed from the provider", body = ExchangeRatesResponse),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider unreachable or rejected the request", body = ErrorResponse)
    )
)]
async fn get_exchange_rates() {}

/// Latest USD-based exchange rates (the request body is ignored)
#[utoipa::path(
    post,
    path = "/get-exchange-rates",
    tag = "rates",
    responses(
        (status = 200, description = "Rates relayed from the provider", body = ExchangeRatesResponse),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider unreachable or rejected the request", body = ErrorResponse)
    )
)]
async fn post_exchange_rates() {}

/// OpenAPI documentation for the exchange-rate proxy.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Pricing Rates API",
        version = "1.0.0",
        description = "Relays USD-based exchange rates for the storefront's supported display currencies (USD, PHP, JPY, CAD, EUR).\n\nBrowsers may call `/get-exchange-rates` cross-origin; `OPTIONS` preflights are answered with permissive CORS headers.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        get_exchange_rates,
        post_exchange_rates,
    ),
    components(
        schemas(
            ExchangeRatesResponse,
            ErrorResponse,
            CurrencyInfo,
            CurrencyCode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currencies", description = "Currency catalog"),
        (name = "rates", description = "Exchange-rate proxy"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/currencies".to_string()));
        assert!(paths.contains(&"/get-exchange-rates".to_string()));
    }
}
