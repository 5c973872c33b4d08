//! Fixed-table rate source for development and offline mode.

use async_trait::async_trait;

use pricing_types::{RateFetchError, RateSource, RateTable};

/// Always returns the same table.
pub struct StaticRateSource {
    table: RateTable,
}

impl StaticRateSource {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// The catalog's reference rates.
    pub fn reference() -> Self {
        Self::new(RateTable::reference())
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
        Ok(self.table.clone())
    }
}
