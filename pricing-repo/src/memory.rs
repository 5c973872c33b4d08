//! In-memory preference store.

use async_trait::async_trait;
use dashmap::DashMap;

use exchange_rates::CurrencyCode;
use pricing_types::{PreferenceError, PreferenceStore, ViewerId};

/// Holds raw `currency_preference` values keyed by viewer.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    profiles: DashMap<ViewerId, String>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value as-is, including values outside the supported set.
    pub fn insert_raw(&self, viewer: ViewerId, value: impl Into<String>) {
        self.profiles.insert(viewer, value.into());
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load_preference(&self, viewer: &ViewerId) -> Result<Option<String>, PreferenceError> {
        Ok(self.profiles.get(viewer).map(|v| v.value().clone()))
    }

    async fn save_preference(
        &self,
        viewer: &ViewerId,
        currency: CurrencyCode,
    ) -> Result<(), PreferenceError> {
        self.profiles
            .insert(viewer.clone(), currency.code().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(id: &str) -> ViewerId {
        ViewerId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_viewer_has_no_preference() {
        let store = InMemoryPreferenceStore::new();
        assert_eq!(store.load_preference(&viewer("nobody")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemoryPreferenceStore::new();
        store
            .save_preference(&viewer("alice"), CurrencyCode::PHP)
            .await
            .unwrap();
        assert_eq!(
            store.load_preference(&viewer("alice")).await.unwrap(),
            Some("PHP".to_string())
        );
    }

    #[tokio::test]
    async fn test_raw_values_are_returned_unvalidated() {
        let store = InMemoryPreferenceStore::new();
        store.insert_raw(viewer("bob"), "XYZ");
        assert_eq!(
            store.load_preference(&viewer("bob")).await.unwrap(),
            Some("XYZ".to_string())
        );
    }
}
