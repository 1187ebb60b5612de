//! Live rate provider port.
//!
//! Implementations can be HTTP clients, fixed tables, routing registries, etc.

use crate::domain::{CurrencyCode, RateRecord};
use crate::error::ProviderError;

/// Port trait for live (upstream) rate sources.
#[async_trait::async_trait]
pub trait LiveRateProvider: Send + Sync + 'static {
    /// Identifier stamped on every record this provider produces.
    fn name(&self) -> &str;

    /// Whether a live rate can be fetched for the currency at all.
    fn supports(&self, currency: &CurrencyCode) -> bool;

    /// Fetches a live USD → `currency` rate.
    ///
    /// Returns `ProviderError::Unconfigured` for unsupported currencies
    /// without touching the network.
    async fn fetch_live(&self, currency: &CurrencyCode) -> Result<RateRecord, ProviderError>;
}
