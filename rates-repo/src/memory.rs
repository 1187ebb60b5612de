//! In-memory rate store for tests and `memory://` deployments.

use async_trait::async_trait;
use dashmap::DashMap;

use rates_types::{CurrencyCode, RateRecord, RateStore, StoreError};

/// `RateStore` backed by a concurrent map. Contents do not survive restarts.
#[derive(Default)]
pub struct InMemoryRateStore {
    rates: DashMap<CurrencyCode, RateRecord>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, StoreError> {
        Ok(self.rates.get(currency).map(|entry| entry.value().clone()))
    }

    async fn put(&self, record: &RateRecord) -> Result<(), StoreError> {
        self.rates.insert(record.target().clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RateRecord>, StoreError> {
        let mut records: Vec<RateRecord> =
            self.rates.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| a.target().cmp(b.target()));
        Ok(records)
    }
}
