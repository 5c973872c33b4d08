//! Read-only price handles for UI consumers.

use std::sync::Arc;

use exchange_rates::CurrencyCode;
use pricing_types::{PricingError, RateSource};

use crate::service::CurrencyService;

/// What a price consumer may ask of the currency service.
pub trait PriceFormatter: Send + Sync {
    fn currency(&self) -> CurrencyCode;
    fn convert(&self, amount_usd: f64) -> Result<f64, PricingError>;
    fn format_price(&self, amount_usd: f64) -> Result<String, PricingError>;
}

impl<S: RateSource> PriceFormatter for CurrencyService<S> {
    fn currency(&self) -> CurrencyCode {
        self.active_currency()
    }

    fn convert(&self, amount_usd: f64) -> Result<f64, PricingError> {
        CurrencyService::convert(self, amount_usd)
    }

    fn format_price(&self, amount_usd: f64) -> Result<String, PricingError> {
        CurrencyService::format_price(self, amount_usd)
    }
}

/// Cheap, clonable handle given to every element that shows a price.
///
/// It cannot refresh rates, switch currency or end the session.
#[derive(Clone)]
pub struct PriceDisplay {
    formatter: Arc<dyn PriceFormatter>,
}

impl PriceDisplay {
    pub fn new(formatter: Arc<dyn PriceFormatter>) -> Self {
        Self { formatter }
    }

    pub fn currency(&self) -> CurrencyCode {
        self.formatter.currency()
    }

    pub fn format_price(&self, amount_usd: f64) -> Result<String, PricingError> {
        self.formatter.format_price(amount_usd)
    }

    /// Price label for a view; an invalid amount renders as an empty label.
    pub fn render(&self, amount_usd: f64) -> String {
        self.formatter
            .format_price(amount_usd)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Not rendering price");
                String::new()
            })
    }
}

impl std::fmt::Debug for PriceDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceDisplay")
            .field("currency", &self.currency())
            .finish()
    }
}
