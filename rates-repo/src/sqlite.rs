//! SQLite rate store adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use rates_types::{CurrencyCode, RateRecord, RateStore, StoreError};

use crate::types::SqliteRateRow;

const MIGRATION: &str = include_str!("../migrations/0001_create_exchange_rates.sql");

/// SQLite-backed `RateStore`. One row per `(base, target)` pair.
pub struct SqliteRateStore {
    pool: SqlitePool,
}

impl SqliteRateStore {
    /// Connects (creating the file if needed) and creates the schema.
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

        sqlx::query(MIGRATION).execute(&pool).await?;

        tracing::debug!("SQLite rate store ready");
        Ok(Self { pool })
    }

    /// Wraps an existing pool; call [`Self::create_schema`] before use.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(MIGRATION)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl RateStore for SqliteRateStore {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, StoreError> {
        let row: Option<SqliteRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, provider, updated_at
               FROM exchange_rates WHERE base_currency = ? AND target_currency = ?"#,
        )
        .bind(rates_types::BASE_CURRENCY)
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(SqliteRateRow::into_domain).transpose()
    }

    async fn put(&self, record: &RateRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO exchange_rates (base_currency, target_currency, rate, provider, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (base_currency, target_currency) DO UPDATE SET
                   rate = excluded.rate,
                   provider = excluded.provider,
                   updated_at = excluded.updated_at"#,
        )
        .bind(record.base_currency())
        .bind(record.target().as_str())
        .bind(record.rate().to_string())
        .bind(record.provider())
        .bind(record.captured_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<RateRecord>, StoreError> {
        let rows: Vec<SqliteRateRow> = sqlx::query_as(
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
