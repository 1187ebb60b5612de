//! Rate Resolution Service
//!
//! Answers "how many units of X per 1 USD" by walking the tiers in order
//! (L1, L2, persistent store, live provider) and degrading according to the
//! requested consistency mode when every tier comes up empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use rates_types::{
    ConsistencyMode, CurrencyCode, DistributedCache, LiveRateProvider, ProviderError, RateRecord,
    RateStore, RecordError, ResolveError,
};

use crate::config::ResolverConfig;
use crate::l1::InProcessRateCache;
use crate::tiers::{self, Lookup};

/// Multi-tier USD-based rate resolver.
///
/// Every collaborator is injected; the resolver holds no global state and
/// is shared across tasks behind an `Arc`.
pub struct RateResolver {
    l1: Arc<InProcessRateCache>,
    l2: Arc<dyn DistributedCache>,
    store: Arc<dyn RateStore>,
    provider: Arc<dyn LiveRateProvider>,
    config: ResolverConfig,
}

impl RateResolver {
    pub fn new(
        l1: Arc<InProcessRateCache>,
        l2: Arc<dyn DistributedCache>,
        store: Arc<dyn RateStore>,
        provider: Arc<dyn LiveRateProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            l1,
            l2,
            store,
            provider,
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves the USD → `currency` rate.
    ///
    /// USD (or empty input) is always exactly 1 and touches no tier.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        currency: &str,
        mode: ConsistencyMode,
    ) -> Result<Decimal, ResolveError> {
        let currency = CurrencyCode::parse(currency)?;
        if currency.is_base() {
            return Ok(Decimal::ONE);
        }
        self.resolve_code(&currency, mode).await
    }

    async fn resolve_code(
        &self,
        currency: &CurrencyCode,
        mode: ConsistencyMode,
    ) -> Result<Decimal, ResolveError> {
        let now = Utc::now();
        let mut untrusted_seen: Option<RateRecord> = None;

        match tiers::check_l1(&self.l1, currency, &self.config, mode, now) {
            Lookup::Hit(record) => {
                debug!(rate = %record.rate(), "L1 hit");
                return Ok(record.rate());
            }
            Lookup::Untrusted(record) => {
                warn!(provider = record.provider(), "Ignoring untrusted L1 entry");
                untrusted_seen = Some(record);
            }
            Lookup::Stale(_) | Lookup::Miss => {}
        }

        match tiers::check_l2(self.l2.as_ref(), currency, &self.config, mode, now).await {
            Lookup::Hit(record) => {
                debug!(rate = %record.rate(), "L2 hit");
                self.l1.insert(record.clone());
                return Ok(record.rate());
            }
            Lookup::Untrusted(record) => {
                warn!(provider = record.provider(), "Ignoring untrusted L2 entry");
                untrusted_seen.get_or_insert(record);
            }
            Lookup::Stale(_) | Lookup::Miss => {}
        }

        let stored = tiers::check_store(self.store.as_ref(), currency, &self.config, mode, now).await;
        if let Lookup::Hit(record) = &stored {
            debug!(rate = %record.rate(), "Store hit");
            self.fill_l2(record).await;
            self.l1.insert(record.clone());
            return Ok(record.rate());
        }

        match self.provider.fetch_live(currency).await {
            Ok(record) => self.accept_live(record, mode).await,
            Err(err) => self.degrade(currency, mode, stored, untrusted_seen, err),
        }
    }

    /// Writes a fetched record through the tiers and returns its rate.
    ///
    /// A restricted currency's record from a non-authoritative provider is
    /// refused in strict mode and kept out of the persistent store otherwise.
    async fn accept_live(
        &self,
        record: RateRecord,
        mode: ConsistencyMode,
    ) -> Result<Decimal, ResolveError> {
        let authoritative = self.config.is_trusted(&record, ConsistencyMode::Strict);

        if authoritative {
            if let Err(e) = self.store.put(&record).await {
                warn!(error = %e, "Failed to persist live rate");
            }
        } else if mode.is_strict() {
            return Err(self.untrusted(record));
        } else {
            warn!(
                provider = record.provider(),
                "Live rate from non-authoritative provider; caching in volatile tiers only"
            );
        }

        self.fill_l2(&record).await;
        self.l1.insert(record.clone());

        info!(rate = %record.rate(), provider = record.provider(), "Resolved live rate");
        Ok(record.rate())
    }

    /// Picks the answer once the live fetch has failed.
    fn degrade(
        &self,
        currency: &CurrencyCode,
        mode: ConsistencyMode,
        stored: Lookup,
        untrusted_seen: Option<RateRecord>,
        err: ProviderError,
    ) -> Result<Decimal, ResolveError> {
        match mode {
            ConsistencyMode::NonStrict => match stored.record() {
                Some(record) => {
                    warn!(
                        error = %err,
                        captured_at = %record.captured_at(),
                        "Live fetch failed; serving stored rate"
                    );
                    Ok(record.rate())
                }
                None => {
                    warn!(error = %err, "No rate available; falling back to identity");
                    Ok(Decimal::ONE)
                }
            },
            ConsistencyMode::Strict => match (stored, untrusted_seen) {
                (Lookup::Untrusted(record), _) | (Lookup::Miss, Some(record)) => {
                    Err(self.untrusted(record))
                }
                (Lookup::Stale(record), _) => Err(ResolveError::RateStale {
                    currency: currency.clone(),
                    captured_at: record.captured_at(),
                }),
                _ => Err(ResolveError::RateUnavailable {
                    currency: currency.clone(),
                    source: err,
                }),
            },
        }
    }

    fn untrusted(&self, record: RateRecord) -> ResolveError {
        let expected = self
            .config
            .authoritative_for(record.target())
            .unwrap_or_default()
            .to_string();
        ResolveError::UntrustedSource {
            currency: record.target().clone(),
            provider: record.provider().to_string(),
            expected,
        }
    }

    async fn fill_l2(&self, record: &RateRecord) {
        if let Err(e) = self.l2.put(record).await {
            warn!(currency = %record.target(), error = %e, "Failed to write distributed cache");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts a USD amount into `currency`.
    #[instrument(skip(self))]
    pub async fn convert_from_usd(
        &self,
        amount_usd: Decimal,
        currency: &str,
        mode: ConsistencyMode,
    ) -> Result<Decimal, ResolveError> {
        let code = CurrencyCode::parse(currency)?;
        let rate = self.resolve(currency, mode).await?;
        amount_usd
            .checked_mul(rate)
            .ok_or(ResolveError::ConversionOverflow {
                amount: amount_usd,
                currency: code,
            })
    }

    /// Converts an amount in `currency` into USD.
    #[instrument(skip(self))]
    pub async fn convert_to_usd(
        &self,
        amount_local: Decimal,
        currency: &str,
        mode: ConsistencyMode,
    ) -> Result<Decimal, ResolveError> {
        let code = CurrencyCode::parse(currency)?;
        let rate = self.resolve(currency, mode).await?;
        amount_local
            .checked_div(rate)
            .ok_or(ResolveError::ConversionOverflow {
                amount: amount_local,
                currency: code,
            })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Listing and manual writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Every known rate: the persistent store's rows plus unexpired L1 entries
    /// for currencies the store does not hold.
    pub async fn list_cached_rates(&self) -> BTreeMap<CurrencyCode, Decimal> {
        let mut rates = BTreeMap::new();

        match self.store.list().await {
            Ok(records) => {
                for record in records {
                    rates.insert(record.target().clone(), record.rate());
                }
            }
            Err(e) => warn!(error = %e, "Failed to list stored rates; showing L1 only"),
        }

        for record in self.l1.records_within(self.config.l1_ttl, Utc::now()) {
            rates
                .entry(record.target().clone())
                .or_insert_with(|| record.rate());
        }
        rates
    }

    /// Stores an explicitly supplied rate in every tier.
    ///
    /// The persistent write must succeed; the cache writes are best effort.
    #[instrument(skip(self))]
    pub async fn record_rate(
        &self,
        currency: &str,
        rate: Decimal,
        provider: &str,
    ) -> Result<RateRecord, RecordError> {
        let currency = CurrencyCode::parse(currency)?;
        let record = RateRecord::new(currency, rate, provider, Utc::now())?;

        self.store.put(&record).await?;
        self.fill_l2(&record).await;
        self.l1.insert(record.clone());

        info!(currency = %record.target(), "Recorded rate");
        Ok(record)
    }
}
