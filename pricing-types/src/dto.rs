//! Data Transfer Objects (DTOs) for the exchange-rate proxy and tooling output.

use std::collections::BTreeMap;

use exchange_rates::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RateTable;

/// Successful `get-exchange-rates` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRatesResponse {
    /// Units of each currency per one USD
    #[schema(example = json!({"USD": 1.0, "PHP": 56.0, "JPY": 149.5, "CAD": 1.35, "EUR": 0.92}))]
    pub rates: BTreeMap<String, f64>,
    /// Provider date of the rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-05-01")]
    pub timestamp: Option<String>,
}

impl From<&RateTable> for ExchangeRatesResponse {
    fn from(table: &RateTable) -> Self {
        Self {
            rates: table.to_wire(),
            timestamp: table.as_of().map(String::from),
        }
    }
}

impl ExchangeRatesResponse {
    pub fn into_table(self) -> RateTable {
        RateTable::from_raw(self.rates, self.timestamp)
    }
}

/// Failure body returned with a 5xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Exchange rate API error: 503")]
    pub error: String,
}

/// A supported currency as listed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    #[schema(example = "₱")]
    pub symbol: String,
    #[schema(example = "Philippine Peso")]
    pub name: String,
}

impl From<CurrencyCode> for CurrencyInfo {
    fn from(code: CurrencyCode) -> Self {
        Self {
            code,
            symbol: code.symbol().to_string(),
            name: code.name().to_string(),
        }
    }
}

/// A USD price rendered in a display currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormattedPrice {
    #[schema(example = 100.0)]
    pub amount_usd: f64,
    pub currency: CurrencyCode,
    #[schema(example = 14950.0)]
    pub converted: f64,
    #[schema(example = "¥14,950")]
    pub display: String,
}
