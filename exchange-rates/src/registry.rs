//! Routes live fetches to the provider responsible for each currency.

use async_trait::async_trait;
use rates_types::{CurrencyCode, LiveRateProvider, ProviderError, RateRecord};
use std::sync::Arc;
use tracing::debug;

/// Ordered set of providers; the first one supporting a currency wins.
///
/// A currency no provider supports fails with `ProviderError::Unconfigured`
/// without any network traffic.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn LiveRateProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry (every currency is unconfigured).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn LiveRateProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    fn route(&self, currency: &CurrencyCode) -> Option<&Arc<dyn LiveRateProvider>> {
        self.providers.iter().find(|p| p.supports(currency))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl LiveRateProvider for ProviderRegistry {
    fn name(&self) -> &str {
        "registry"
    }

    fn supports(&self, currency: &CurrencyCode) -> bool {
        self.route(currency).is_some()
    }

    async fn fetch_live(&self, currency: &CurrencyCode) -> Result<RateRecord, ProviderError> {
        match self.route(currency) {
            Some(provider) => {
                debug!(currency = %currency, provider = provider.name(), "Routing live fetch");
                provider.fetch_live(currency).await
            }
            None => Err(ProviderError::Unconfigured(currency.clone())),
        }
    }
}
