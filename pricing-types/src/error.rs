//! Error types for storefront pricing.

use exchange_rates::UnknownCurrency;

use crate::ports::RateFetchError;

/// Domain-level errors raised by price display operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Viewer id cannot be empty")]
    InvalidViewer,
}

impl From<UnknownCurrency> for PricingError {
    fn from(err: UnknownCurrency) -> Self {
        PricingError::UnsupportedCurrency(err.0)
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Upstream(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RateFetchError> for AppError {
    fn from(err: RateFetchError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
