//! Conversion multipliers relative to the base currency.

use std::collections::{BTreeMap, HashMap};

use exchange_rates::{BASE_CURRENCY, CurrencyCode};

use super::PriceUsd;

/// Multipliers from USD to each supported currency.
///
/// The base entry (`USD = 1.0`) is always present. A table is replaced
/// wholesale on refresh and never merged, so every multiplier in one table
/// comes from the same provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, f64>,
    as_of: Option<String>,
}

impl RateTable {
    /// The table a session starts with: `{USD: 1.0}`.
    pub fn base() -> Self {
        Self {
            rates: HashMap::from([(BASE_CURRENCY, 1.0)]),
            as_of: None,
        }
    }

    /// Builds a table from a provider's code → rate map.
    ///
    /// Unsupported codes and non-positive or non-finite rates are dropped;
    /// the base entry is forced to 1.0.
    pub fn from_raw<I, K>(raw: I, as_of: Option<String>) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let rates = raw
            .into_iter()
            .filter_map(|(code, rate)| code.as_ref().parse::<CurrencyCode>().ok().map(|c| (c, rate)));
        Self::from_rates(rates, as_of)
    }

    pub fn from_rates<I>(rates: I, as_of: Option<String>) -> Self
    where
        I: IntoIterator<Item = (CurrencyCode, f64)>,
    {
        let mut rates: HashMap<CurrencyCode, f64> = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.insert(BASE_CURRENCY, 1.0);
        Self { rates, as_of }
    }

    /// Development/offline table built from the catalog's reference rates.
    pub fn reference() -> Self {
        Self::from_rates(exchange_rates::reference_rates(), None)
    }

    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(&code).copied()
    }

    /// Multiplier for `code`; a missing entry means "no conversion available" (1.0).
    pub fn rate(&self, code: CurrencyCode) -> f64 {
        self.get(code).unwrap_or(1.0)
    }

    pub fn convert(&self, amount: PriceUsd, to: CurrencyCode) -> f64 {
        amount.value() * self.rate(to)
    }

    /// Supported codes without an entry, in catalog order.
    pub fn missing_codes(&self) -> Vec<CurrencyCode> {
        CurrencyCode::all()
            .iter()
            .copied()
            .filter(|c| !self.rates.contains_key(c))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_codes().is_empty()
    }

    /// Gives every missing supported code the unconverted multiplier 1.0.
    pub fn with_missing_unconverted(mut self) -> Self {
        for code in self.missing_codes() {
            self.rates.insert(code, 1.0);
        }
        self
    }

    /// Provider date or timestamp of the rates, when it reported one.
    pub fn as_of(&self) -> Option<&str> {
        self.as_of.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries keyed by ISO code, ordered for stable output.
    pub fn to_wire(&self) -> BTreeMap<String, f64> {
        self.rates
            .iter()
            .map(|(code, rate)| (code.code().to_string(), *rate))
            .collect()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::base()
    }
}
