//! In-process (L1) rate cache.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use rates_types::{CurrencyCode, RateRecord};

/// A record plus the moment it entered L1.
#[derive(Debug, Clone)]
pub struct L1Entry {
    pub record: RateRecord,
    pub cached_at: DateTime<Utc>,
}

/// Process-local rate cache, shared by reference with the resolver.
///
/// Entries are never evicted; expiry is decided by the reader against the
/// configured TTL. Concurrent writers: last write wins.
#[derive(Debug, Default)]
pub struct InProcessRateCache {
    entries: DashMap<CurrencyCode, L1Entry>,
}

impl InProcessRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<L1Entry> {
        self.entries.get(currency).map(|e| e.value().clone())
    }

    pub fn insert(&self, record: RateRecord) {
        self.insert_at(record, Utc::now());
    }

    /// Inserts with an explicit cache time.
    pub fn insert_at(&self, record: RateRecord, cached_at: DateTime<Utc>) {
        self.entries
            .insert(record.target().clone(), L1Entry { record, cached_at });
    }

    /// Records cached no longer than `ttl` before `now`.
    pub fn records_within(&self, ttl: Duration, now: DateTime<Utc>) -> Vec<RateRecord> {
        self.entries
            .iter()
            .filter(|e| now.signed_duration_since(e.cached_at) <= ttl)
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
