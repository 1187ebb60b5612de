//! Distributed cache adapters and their shared wire payload.
//!
//! Every backend stores one entry per target currency under
//! `rate:<TARGET>`, holding `{rate, captured_at, provider}` as JSON.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rates_types::{CacheError, CurrencyCode, RateRecord};

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

/// Cache key for a target currency.
pub fn cache_key(currency: &CurrencyCode) -> String {
    format!("rate:{}", currency)
}

/// JSON value stored under [`cache_key`].
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedRate {
    pub rate: Decimal,
    pub captured_at: DateTime<Utc>,
    pub provider: String,
}

/// Serializes the cached fields of a record.
pub fn encode(record: &RateRecord) -> Result<String, CacheError> {
    let payload = CachedRate {
        rate: record.rate(),
        captured_at: record.captured_at(),
        provider: record.provider().to_string(),
    };
    serde_json::to_string(&payload).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Rebuilds a record for `currency` from a cached value, re-running validation.
pub fn decode(currency: &CurrencyCode, raw: &str) -> Result<RateRecord, CacheError> {
    let payload: CachedRate =
        serde_json::from_str(raw).map_err(|e| CacheError::Serialization(e.to_string()))?;
    RateRecord::new(
        currency.clone(),
        payload.rate,
        payload.provider,
        payload.captured_at,
    )
    .map_err(|e| CacheError::Serialization(e.to_string()))
}
