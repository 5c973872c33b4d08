//! PostgreSQL preference store adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use exchange_rates::CurrencyCode;
use pricing_types::{PreferenceError, PreferenceStore, ViewerId};

/// `profiles` table in a PostgreSQL database.
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresPreferenceStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_profiles_pg.sql"),
            "0001",
        )
        .await?;
        tracing::info!("Preference store migrations applied");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn storage_error(err: sqlx::Error) -> PreferenceError {
    PreferenceError::Storage(err.to_string())
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn load_preference(&self, viewer: &ViewerId) -> Result<Option<String>, PreferenceError> {
        let row: Option<Option<String>> =
            sqlx::query_scalar("SELECT currency_preference FROM profiles WHERE id = $1")
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
            "INSERT INTO profiles (id, currency_preference, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (id) DO UPDATE SET \
             currency_preference = EXCLUDED.currency_preference, updated_at = now()",
        )
        .bind(viewer.as_str())
        .bind(currency.code())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}
