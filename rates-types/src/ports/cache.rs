//! Distributed cache port.

use crate::domain::{CurrencyCode, RateRecord};
use crate::error::CacheError;

/// Shared, TTL-bounded cache keyed by target currency.
///
/// The TTL is fixed when the adapter is built; an expired entry is simply
/// absent from `get`.
#[async_trait::async_trait]
pub trait DistributedCache: Send + Sync + 'static {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, CacheError>;

    async fn put(&self, record: &RateRecord) -> Result<(), CacheError>;
}
