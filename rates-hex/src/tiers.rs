//! Per-tier lookups composed by the resolver.
//!
//! Each check reports what it found in the same [`Lookup`] shape. Adapter
//! errors are logged here and reported as a miss.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use rates_types::{ConsistencyMode, CurrencyCode, DistributedCache, RateRecord, RateStore};

use crate::config::ResolverConfig;
use crate::l1::InProcessRateCache;

/// Outcome of consulting one tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Fresh and trusted under the requested mode.
    Hit(RateRecord),
    /// Not from the authoritative provider (strict mode only).
    Untrusted(RateRecord),
    /// Outside the tier's freshness window. From the store, also trusted.
    Stale(RateRecord),
    Miss,
}

impl Lookup {
    fn classify(
        record: RateRecord,
        fresh: bool,
        config: &ResolverConfig,
        mode: ConsistencyMode,
    ) -> Self {
        if !config.is_trusted(&record, mode) {
            Lookup::Untrusted(record)
        } else if fresh {
            Lookup::Hit(record)
        } else {
            Lookup::Stale(record)
        }
    }

    pub fn record(&self) -> Option<&RateRecord> {
        match self {
            Lookup::Hit(r) | Lookup::Untrusted(r) | Lookup::Stale(r) => Some(r),
            Lookup::Miss => None,
        }
    }
}

/// L1: age is measured from when the entry was cached, against `l1_ttl`.
pub fn check_l1(
    l1: &InProcessRateCache,
    currency: &CurrencyCode,
    config: &ResolverConfig,
    mode: ConsistencyMode,
    now: DateTime<Utc>,
) -> Lookup {
    let Some(entry) = l1.get(currency) else {
        return Lookup::Miss;
    };
    if now.signed_duration_since(entry.cached_at) > config.l1_ttl {
        debug!(%currency, "L1 entry expired");
        return Lookup::Miss;
    }
    Lookup::classify(entry.record, true, config, mode)
}

/// L2: the adapter enforces its own TTL; the record's capture time must also
/// fall within `sync_interval`.
pub async fn check_l2(
    cache: &dyn DistributedCache,
    currency: &CurrencyCode,
    config: &ResolverConfig,
    mode: ConsistencyMode,
    now: DateTime<Utc>,
) -> Lookup {
    match cache.get(currency).await {
        Ok(Some(record)) if !record.is_fresh_within(config.sync_interval, now) => {
            debug!(%currency, captured_at = %record.captured_at(), "L2 entry outlived sync interval");
            Lookup::Stale(record)
        }
        Ok(Some(record)) => Lookup::classify(record, true, config, mode),
        Ok(None) => Lookup::Miss,
        Err(e) => {
            warn!(%currency, error = %e, "Distributed cache read failed; treating as miss");
            Lookup::Miss
        }
    }
}

/// Persistent store: fresh when captured within `sync_interval`.
pub async fn check_store(
    store: &dyn RateStore,
    currency: &CurrencyCode,
    config: &ResolverConfig,
    mode: ConsistencyMode,
    now: DateTime<Utc>,
) -> Lookup {
    match store.get(currency).await {
        Ok(Some(record)) => {
            let fresh = record.is_fresh_within(config.sync_interval, now);
            Lookup::classify(record, fresh, config, mode)
        }
        Ok(None) => Lookup::Miss,
        Err(e) => {
            warn!(%currency, error = %e, "Rate store read failed; treating as miss");
            Lookup::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use super::*;

    fn eur(at: DateTime<Utc>) -> RateRecord {
        RateRecord::new(CurrencyCode::parse("EUR").unwrap(), dec!(0.92), "mock", at).unwrap()
    }

    #[test]
    fn test_l1_entry_is_fresh_up_to_ttl_inclusive() {
        let config = ResolverConfig::default();
        let l1 = InProcessRateCache::new();
        let eur_code = CurrencyCode::parse("EUR").unwrap();
        let cached_at = Utc::now();
        l1.insert_at(eur(cached_at), cached_at);

        let at_ttl = check_l1(
            &l1,
            &eur_code,
            &config,
            ConsistencyMode::Strict,
            cached_at + config.l1_ttl,
        );
        let past_ttl = check_l1(
            &l1,
            &eur_code,
            &config,
            ConsistencyMode::Strict,
            cached_at + config.l1_ttl + Duration::seconds(1),
        );

        assert!(matches!(at_ttl, Lookup::Hit(_)));
        assert_eq!(past_ttl, Lookup::Miss);
    }

    #[test]
    fn test_l1_records_within_ttl() {
        let l1 = InProcessRateCache::new();
        let now = Utc::now();
        l1.insert_at(eur(now), now - Duration::days(3));

        assert!(l1.records_within(Duration::minutes(5), now).is_empty());
        assert_eq!(l1.records_within(Duration::days(3), now).len(), 1);
    }
}
