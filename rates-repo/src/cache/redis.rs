//! Redis-backed distributed cache.

use async_trait::async_trait;
use chrono::Duration;
use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;

use rates_types::{CacheError, CurrencyCode, DistributedCache, RateRecord};

use super::{cache_key, decode, encode};

/// `DistributedCache` over Redis. Entries are written with `SET .. EX <ttl>`,
/// so expiry is enforced by the server.
#[derive(Clone)]
pub struct RedisRateCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisRateCache {
    /// Connects to `redis_url`; entries live for `ttl` (at least one second).
    pub async fn new(redis_url: &str, ttl: Duration) -> anyhow::Result<Self> {
        let client = ::redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        let ttl_secs = ttl.num_seconds().max(1) as u64;

        tracing::debug!(ttl_secs, "Redis rate cache connected");
        Ok(Self { conn, ttl_secs })
    }
}

#[async_trait]
impl DistributedCache for RedisRateCache {
    async fn get(&self, currency: &CurrencyCode) -> Result<Option<RateRecord>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(cache_key(currency))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        raw.map(|raw| decode(currency, &raw)).transpose()
    }

    async fn put(&self, record: &RateRecord) -> Result<(), CacheError> {
        let payload = encode(record)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(cache_key(record.target()), payload, self.ttl_secs)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}
