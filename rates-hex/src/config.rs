//! Resolver configuration.

use std::collections::HashMap;

use chrono::Duration;
use rates_types::{ConsistencyMode, CurrencyCode, RateRecord};

/// Tunables and trust rules for a [`crate::RateResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// How long an L1 entry is served after being cached.
    pub l1_ttl: Duration,
    /// Freshness window for L2 and the persistent store, and the L2 TTL.
    pub sync_interval: Duration,
    /// Restricted currencies mapped to their single authoritative provider id.
    pub restricted: HashMap<CurrencyCode, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            l1_ttl: Duration::minutes(5),
            sync_interval: Duration::hours(24),
            restricted: HashMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn with_l1_ttl(mut self, ttl: Duration) -> Self {
        self.l1_ttl = ttl;
        self
    }

    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Marks `currency` as restricted to rates from `provider_id`.
    pub fn with_restricted_currency(
        mut self,
        currency: CurrencyCode,
        provider_id: impl Into<String>,
    ) -> Self {
        self.restricted.insert(currency, provider_id.into());
        self
    }

    /// The authoritative provider id, if `currency` is restricted.
    pub fn authoritative_for(&self, currency: &CurrencyCode) -> Option<&str> {
        self.restricted.get(currency).map(String::as_str)
    }

    /// Whether `record` may be served under `mode`.
    ///
    /// Non-strict accepts every record. Strict accepts a restricted
    /// currency's record only from its authoritative provider.
    pub fn is_trusted(&self, record: &RateRecord, mode: ConsistencyMode) -> bool {
        if !mode.is_strict() {
            return true;
        }
        match self.authoritative_for(record.target()) {
            Some(expected) => record.provider() == expected,
            None => true,
        }
    }
}
