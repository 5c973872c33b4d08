//! Countries offered at sign-up and the display currency each implies.

use exchange_rates::{BASE_CURRENCY, CurrencyCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A country as reported by a country directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub name: String,
    /// ISO 4217 codes in the order the directory lists them
    pub currencies: Vec<String>,
}

/// A selectable country with its default display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    #[schema(example = "PH")]
    pub code: String,
    #[schema(example = "Philippines")]
    pub name: String,
    pub currency: CurrencyCode,
}

impl Country {
    /// Uses the country's first listed currency when it is supported, else USD.
    pub fn from_record(record: CountryRecord) -> Self {
        let currency = record
            .currencies
            .first()
            .and_then(|code| code.parse::<CurrencyCode>().ok())
            .unwrap_or(BASE_CURRENCY);
        Self {
            code: record.code,
            name: record.name,
            currency,
        }
    }

    /// Offered when the directory cannot be reached.
    pub fn fallback_list() -> Vec<Country> {
        [
            ("US", "United States", CurrencyCode::USD),
            ("PH", "Philippines", CurrencyCode::PHP),
            ("JP", "Japan", CurrencyCode::JPY),
            ("CA", "Canada", CurrencyCode::CAD),
            ("FR", "France", CurrencyCode::EUR),
        ]
        .into_iter()
        .map(|(code, name, currency)| Country {
            code: code.into(),
            name: name.into(),
            currency,
        })
        .collect()
    }
}
