//! Database row structs and their mapping back into validated domain records.

use sqlx::FromRow;

use rates_types::{BASE_CURRENCY, CurrencyCode, RateRecord, StoreError};

#[cfg(feature = "postgres")]
use chrono::{DateTime, Utc};
#[cfg(feature = "postgres")]
use rust_decimal::Decimal;

fn decode_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Decode(e.to_string())
}

/// Rebuilds a record through domain validation; anything that fails is corrupt.
fn build_record(
    base_currency: &str,
    target_currency: &str,
    rate: rust_decimal::Decimal,
    provider: String,
    captured_at: chrono::DateTime<chrono::Utc>,
) -> Result<RateRecord, StoreError> {
    if base_currency != BASE_CURRENCY {
        return Err(StoreError::Decode(format!(
            "unsupported base currency {}",
            base_currency
        )));
    }
    let target = CurrencyCode::parse(target_currency).map_err(decode_err)?;
    RateRecord::new(target, rate, provider, captured_at).map_err(decode_err)
}

/// `exchange_rates` row as stored by SQLite (decimal and timestamp as TEXT).
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteRateRow {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: String,
    pub provider: String,
    pub updated_at: String,
}

#[cfg(feature = "sqlite")]
impl SqliteRateRow {
    pub fn into_domain(self) -> Result<RateRecord, StoreError> {
        use std::str::FromStr;

        let rate = rust_decimal::Decimal::from_str(&self.rate).map_err(decode_err)?;
        let captured_at = chrono::DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(decode_err)?
            .with_timezone(&chrono::Utc);

        build_record(
            &self.base_currency,
            &self.target_currency,
            rate,
            self.provider,
            captured_at,
        )
    }
}

/// `exchange_rates` row as stored by PostgreSQL (NUMERIC, TIMESTAMPTZ).
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgRateRow {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: Decimal,
    pub provider: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "postgres")]
impl PgRateRow {
    pub fn into_domain(self) -> Result<RateRecord, StoreError> {
        build_record(
            &self.base_currency,
            &self.target_currency,
            self.rate,
            self.provider,
            self.updated_at,
        )
    }
}
