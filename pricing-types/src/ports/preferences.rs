//! Viewer preference storage port.
//!
//! Backed by the `currency_preference` field of a viewer's profile record.

use exchange_rates::CurrencyCode;

use crate::domain::ViewerId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference storage error: {0}")]
    Storage(String),
}

#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Returns the raw stored value, `None` when the viewer or the field is absent.
    async fn load_preference(&self, viewer: &ViewerId) -> Result<Option<String>, PreferenceError>;

    /// Persists a viewer's choice (sign-up and account settings write this).
    async fn save_preference(
        &self,
        viewer: &ViewerId,
        currency: CurrencyCode,
    ) -> Result<(), PreferenceError>;
}

#[async_trait::async_trait]
impl<T: PreferenceStore + ?Sized> PreferenceStore for std::sync::Arc<T> {
    async fn load_preference(&self, viewer: &ViewerId) -> Result<Option<String>, PreferenceError> {
        (**self).load_preference(viewer).await
    }

    async fn save_preference(
        &self,
        viewer: &ViewerId,
        currency: CurrencyCode,
    ) -> Result<(), PreferenceError> {
        (**self).save_preference(viewer, currency).await
    }
}
