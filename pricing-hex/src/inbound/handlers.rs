//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use exchange_rates::CurrencyCode;
use pricing_types::{AppError, CurrencyInfo, ErrorResponse, ExchangeRatesResponse, RateSource};

use crate::openapi::ApiDoc;

/// Request headers browsers may send to the proxy.
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Application state shared across handlers.
pub struct AppState<S: RateSource> {
    pub source: S,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) | AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Supported display currencies.
pub async fn list_currencies() -> Json<Vec<CurrencyInfo>> {
    Json(
        CurrencyCode::all()
            .iter()
            .copied()
            .map(CurrencyInfo::from)
            .collect(),
    )
}

/// Relays the latest USD-based rates from the upstream provider.
///
/// One upstream call per request; nothing is cached here.
#[tracing::instrument(skip(state))]
pub async fn get_exchange_rates<S: RateSource>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ExchangeRatesResponse>, ApiError> {
    let table = state.source.fetch_rates().await.map_err(|err| {
        tracing::error!(error = %err, "Error fetching exchange rates");
        AppError::from(err)
    })?;

    tracing::debug!(entries = table.len(), as_of = ?table.as_of(), "Relaying exchange rates");
    Ok(Json(ExchangeRatesResponse::from(&table)))
}

/// CORS preflight; also answers bare `OPTIONS` requests.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            ),
        ],
    )
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
