//! Viewer currency preference resolution.

use async_trait::async_trait;

use exchange_rates::{BASE_CURRENCY, CurrencyCode};
use pricing_types::{PreferenceError, PreferenceStore, StoredPreference, ViewerId};

/// Resolves which currency a viewer sees prices in.
///
/// Never fails: no viewer, no stored value, an unsupported value, or a storage
/// error all resolve to USD.
pub struct UserCurrencyPreference<P: PreferenceStore> {
    store: P,
}

impl<P: PreferenceStore> UserCurrencyPreference<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve_preference(&self, viewer: Option<&ViewerId>) -> CurrencyCode {
        let Some(viewer) = viewer else {
            return BASE_CURRENCY;
        };

        let raw = match self.store.load_preference(viewer).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "Could not load currency preference, using USD");
                return BASE_CURRENCY;
            }
        };

        match StoredPreference::parse(raw.as_deref()) {
            StoredPreference::Supported(code) => code,
            StoredPreference::Absent => BASE_CURRENCY,
            StoredPreference::Unsupported(value) => {
                tracing::warn!(%value, "Ignoring unsupported currency preference");
                BASE_CURRENCY
            }
        }
    }

    /// Records a viewer's explicit choice from account settings.
    pub async fn update_preference(
        &self,
        viewer: &ViewerId,
        currency: CurrencyCode,
    ) -> Result<(), PreferenceError> {
        self.store.save_preference(viewer, currency).await
    }
}

/// Store for sessions without profile storage (anonymous browsing).
pub struct NoPreferences;

#[async_trait]
impl PreferenceStore for NoPreferences {
    async fn load_preference(&self, _viewer: &ViewerId) -> Result<Option<String>, PreferenceError> {
        Ok(None)
    }

    async fn save_preference(
        &self,
        _viewer: &ViewerId,
        _currency: CurrencyCode,
    ) -> Result<(), PreferenceError> {
        Err(PreferenceError::Storage(
            "no preference storage configured".into(),
        ))
    }
}
