//! REST Countries directory adapter.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use pricing_types::{CountryError, CountryRecord, CountrySource};

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";

#[derive(Deserialize)]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(default)]
    currencies: Option<CurrencyKeys>,
}

#[derive(Deserialize)]
struct RawName {
    common: String,
}

/// Keys of the `currencies` object in document order; the first one is the
/// country's primary currency.
struct CurrencyKeys(Vec<String>);

impl<'de> Deserialize<'de> for CurrencyKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = CurrencyKeys;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of currency codes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut keys = Vec::new();
                while let Some((key, _)) = map.next_entry::<String, IgnoredAny>()? {
                    keys.push(key);
                }
                Ok(CurrencyKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

pub struct RestCountriesSource {
    base_url: String,
    http: Client,
}

impl RestCountriesSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

impl Default for RestCountriesSource {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES_URL)
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, CountryError> {
        let body = self
            .http
            .get(format!("{}/all", self.base_url))
            .query(&[("fields", "name,cca2,currencies")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CountryError::Network(e.to_string()))?
            .text()
            .await
            .map_err(|e| CountryError::Network(e.to_string()))?;
        parse_countries(&body)
    }
}

pub(crate) fn parse_countries(body: &str) -> Result<Vec<CountryRecord>, CountryError> {
    let raw: Vec<RawCountry> =
        serde_json::from_str(body).map_err(|e| CountryError::Malformed(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|c| CountryRecord {
            code: c.cca2,
            name: c.name.common,
            currencies: c.currencies.map(|k| k.0).unwrap_or_default(),
        })
        .collect())
}
