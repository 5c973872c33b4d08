//! SQLite preference store adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use exchange_rates::CurrencyCode;
use pricing_types::{PreferenceError, PreferenceStore, ViewerId};

/// `profiles` table in a SQLite database.
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Opens the database and creates the `profiles` table if needed.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_profiles.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn storage_error(err: sqlx::Error) -> PreferenceError {
    PreferenceError::Storage(err.to_string())
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn load_preference(&self, viewer: &ViewerId) -> Result<Option<String>, PreferenceError> {
        let row: Option<Option<String>> =
            sqlx::query_scalar("SELECT currency_preference FROM profiles WHERE id = ?")
                .bind(viewer.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(row.flatten())
    }

    async fn save_preference(
        &self,
        viewer: &ViewerId,
        currency: CurrencyCode,
    ) -> Result<(), PreferenceError> {
        sqlx::query(
            "INSERT INTO profiles (id, currency_preference, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
             currency_preference = excluded.currency_preference, updated_at = excluded.updated_at",
        )
        .bind(viewer.as_str())
        .bind(currency.code())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}
