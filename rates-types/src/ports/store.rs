//! Persistent rate store port.
//!
//! Adapters (SQLite, Postgres, in-memory) implement this trait.

use crate::domain::{CurrencyCode, RateRecord};
use crate::error::StoreError;

/// Durable key/value table of the latest rate per target currency.
///
/// One row per (USD, target) pair; `put` overwrites the existing row.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync + 'static {
    /// Gets the stored record for a currency, if any.
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, StoreError>;

    /// Upserts the record for its target currency.
    async fn put(&self, record: &RateRecord) -> Result<(), StoreError>;

    /// Lists every stored record.
    async fn list(&self) -> Result<Vec<RateRecord>, StoreError>;
}
