//! Country list offered at sign-up.

use pricing_types::{Country, CountrySource};

pub struct CountryDirectory<C: CountrySource> {
    source: C,
}

impl<C: CountrySource> CountryDirectory<C> {
    pub fn new(source: C) -> Self {
        Self { source }
    }

    /// Countries sorted by name, each with its default display currency.
    /// Falls back to the five home countries of the supported currencies.
    pub async fn list_countries(&self) -> Vec<Country> {
        match self.source.fetch_countries().await {
            Ok(records) => {
                let mut countries: Vec<Country> =
                    records.into_iter().map(Country::from_record).collect();
                countries.sort_by_cached_key(|c| c.name.to_lowercase());
                countries
            }
            Err(err) => {
                tracing::error!(error = %err, "Error fetching countries, using fallback list");
                Country::fallback_list()
            }
        }
    }
}
