//! Exchange rate source port.
//!
//! Implementations can be the upstream provider, the rates proxy, fixed tables, etc.

use std::time::Duration;

use crate::domain::RateTable;

/// Why a rate fetch produced no table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateFetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Exchange rate API error: {0}")]
    Status(u16),

    #[error("{0}")]
    Provider(String),

    #[error("Malformed rates payload: {0}")]
    Malformed(String),

    #[error("Rate fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Port trait for exchange rate sources.
///
/// One call is one outbound request. Implementations keep no state between
/// calls and never retry; retry policy belongs to the caller.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches USD-based multipliers for the supported currencies.
    /// The base entry is always present; other entries are best-effort.
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError>;
}

#[async_trait::async_trait]
impl<T: RateSource + ?Sized> RateSource for std::sync::Arc<T> {
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
        (**self).fetch_rates().await
    }
}
