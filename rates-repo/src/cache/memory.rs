//! Process-local stand-in for the distributed cache.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use rates_types::{CacheError, CurrencyCode, DistributedCache, RateRecord};

struct Entry {
    record: RateRecord,
    expires_at: DateTime<Utc>,
}

/// `DistributedCache` with per-entry expiry, for single-process deployments
/// and tests. Expired entries are evicted lazily on read.
pub struct InMemoryDistributedCache {
    entries: DashMap<CurrencyCode, Entry>,
    ttl: Duration,
}

impl InMemoryDistributedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&self, currency: &CurrencyCode) {
        self.entries.remove(currency);
    }
}

#[async_trait]
impl DistributedCache for InMemoryDistributedCache {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, CacheError> {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(currency) {
            if entry.expires_at > now {
                return Ok(Some(entry.record.clone()));
            }
        }
        self.entries.remove_if(currency, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn put(&self, record: &RateRecord) -> Result<(), CacheError> {
        self.entries.insert(
            record.target().clone(),
            Entry {
                record: record.clone(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur_record() -> RateRecord {
        RateRecord::new(CurrencyCode::parse("EUR").unwrap(), dec!(0.92), "fixed", Utc::now())
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = InMemoryDistributedCache::new(Duration::hours(24));
        let record = eur_record();

        cache.put(&record).await.unwrap();

        assert_eq!(cache.get(record.target()).await.unwrap(), Some(record));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_evicted() {
        let cache = InMemoryDistributedCache::new(Duration::zero());
        let record = eur_record();

        cache.put(&record).await.unwrap();

        assert!(cache.get(record.target()).await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = InMemoryDistributedCache::new(Duration::hours(1));
        let record = eur_record();
        cache.put(&record).await.unwrap();

        cache.remove(record.target());

        assert!(cache.get(record.target()).await.unwrap().is_none());
    }
}
