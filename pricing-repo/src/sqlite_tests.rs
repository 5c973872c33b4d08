//! SQLite preference store integration tests.

#[cfg(test)]
mod tests {
    use exchange_rates::CurrencyCode;
    use pricing_types::{PreferenceStore, ViewerId};

    use crate::SqlitePreferenceStore;

    async fn setup_store() -> SqlitePreferenceStore {
        SqlitePreferenceStore::new("sqlite::memory:").await.unwrap()
    }

    fn viewer(id: &str) -> ViewerId {
        ViewerId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let store = setup_store().await;
        let pref = store.load_preference(&viewer("ghost")).await.unwrap();
        assert_eq!(pref, None);
    }

    #[tokio::test]
    async fn test_save_and_load_preference() {
        let store = setup_store().await;
        store
            .save_preference(&viewer("u-1"), CurrencyCode::JPY)
            .await
            .unwrap();

        let pref = store.load_preference(&viewer("u-1")).await.unwrap();
        assert_eq!(pref.as_deref(), Some("JPY"));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_choice() {
        let store = setup_store().await;
        let id = viewer("u-2");
        store.save_preference(&id, CurrencyCode::CAD).await.unwrap();
        store.save_preference(&id, CurrencyCode::EUR).await.unwrap();

        let pref = store.load_preference(&id).await.unwrap();
        assert_eq!(pref.as_deref(), Some("EUR"));
    }

    #[tokio::test]
    async fn test_profile_with_null_preference() {
        let store = setup_store().await;
        sqlx::query("INSERT INTO profiles (id, currency_preference, updated_at) VALUES (?, NULL, ?)")
            .bind("u-3")
            .bind(chrono::Utc::now())
            .execute(store.pool())
            .await
            .unwrap();

        let pref = store.load_preference(&viewer("u-3")).await.unwrap();
        assert_eq!(pref, None);
    }
}
