//! PostgreSQL rate store adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use rates_types::{CurrencyCode, RateRecord, RateStore, StoreError};

use crate::types::PgRateRow;

/// PostgreSQL-backed `RateStore` (NUMERIC rates, TIMESTAMPTZ capture times).
pub struct PostgresRateStore {
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

impl PostgresRateStore {
    /// Connects and creates the schema.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_exchange_rates_pg.sql"),
            "0001",
        )
        .await?;

        tracing::debug!("PostgreSQL rate store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RateStore for PostgresRateStore {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, StoreError> {
        let row: Option<PgRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, provider, updated_at
               FROM exchange_rates WHERE base_currency = $1 AND target_currency = $2"#,
        )
        .bind(rates_types::BASE_CURRENCY)
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(PgRateRow::into_domain).transpose()
    }

    async fn put(&self, record: &RateRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO exchange_rates (base_currency, target_currency, rate, provider, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (base_currency, target_currency) DO UPDATE SET
                   rate = EXCLUDED.rate,
                   provider = EXCLUDED.provider,
                   updated_at = EXCLUDED.updated_at"#,
        )
        .bind(record.base_currency())
        .bind(record.target().as_str())
        .bind(record.rate())
        .bind(record.provider())
        .bind(record.captured_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<RateRecord>, StoreError> {
        let rows: Vec<PgRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, provider, updated_at
               FROM exchange_rates ORDER BY target_currency"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        // A corrupt row is skipped so the rest of the table stays listable.
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let target = row.target_currency.clone();
                match row.into_domain() {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(target_currency = %target, error = %e, "Skipping undecodable rate row");
                        None
                    }
                }
            })
            .collect())
    }
}
