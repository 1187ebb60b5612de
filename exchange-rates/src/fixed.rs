//! Fixed-table rate provider for development, testing and operator-managed
//! currencies.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rates_types::{CurrencyCode, LiveRateProvider, ProviderError, RateRecord};
use rust_decimal::Decimal;

/// Default provider label for fixed rates.
pub const FIXED_PROVIDER: &str = "fixed";

/// Serves rates from an in-memory table.
pub struct FixedRateProvider {
    name: String,
    rates: DashMap<CurrencyCode, Decimal>,
}

impl FixedRateProvider {
    /// Create an empty provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
        }
    }

    /// Reference rates for local runs (target units per USD).
    pub fn development() -> Self {
        let provider = Self::new(FIXED_PROVIDER);
        for (code, rate) in [
            ("EUR", Decimal::new(92, 2)),
            ("GBP", Decimal::new(79, 2)),
            ("INR", Decimal::new(8312, 2)),
        ] {
            if let Ok(code) = CurrencyCode::parse(code) {
                provider.rates.insert(code, rate);
            }
        }
        provider
    }

    pub fn with_rate(self, currency: CurrencyCode, rate: Decimal) -> Self {
        self.set_rate(currency, rate);
        self
    }

    /// Set or replace the rate for a currency.
    pub fn set_rate(&self, currency: CurrencyCode, rate: Decimal) {
        self.rates.insert(currency, rate);
    }
}

impl Default for FixedRateProvider {
    fn default() -> Self {
        Self::new(FIXED_PROVIDER)
    }
}

#[async_trait]
impl LiveRateProvider for FixedRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, currency: &CurrencyCode) -> bool {
        self.rates.contains_key(currency)
    }

    async fn fetch_live(&self, currency: &CurrencyCode) -> Result<RateRecord, ProviderError> {
        let rate = self
            .rates
            .get(currency)
            .map(|r| *r)
            .ok_or_else(|| ProviderError::Unconfigured(currency.clone()))?;

        RateRecord::new(currency.clone(), rate, self.name.clone(), Utc::now())
            .map_err(|e| ProviderError::fetch_failed(currency, e.to_string()))
    }
}
