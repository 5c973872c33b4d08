//! Country directory port.

use crate::domain::CountryRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed country payload: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait CountrySource: Send + Sync + 'static {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, CountryError>;
}

#[async_trait::async_trait]
impl<T: CountrySource + ?Sized> CountrySource for std::sync::Arc<T> {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, CountryError> {
        (**self).fetch_countries().await
    }
}
