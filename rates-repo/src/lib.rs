//! # Rates Repository
//!
//! Concrete adapters for the persistence-facing ports of the rate resolver:
//! the durable `RateStore` (SQLite, PostgreSQL, in-memory) and the shared
//! `DistributedCache` (Redis, in-memory).

use std::sync::Arc;

use rates_types::RateStore;

pub mod cache;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
mod types;


pub use cache::memory::InMemoryDistributedCache;
#[cfg(feature = "redis")]
pub use cache::redis::RedisRateCache;
pub use memory::InMemoryRateStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresRateStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRateStore;

/// Build and initialize a rate store from a database URL.
///
/// The adapter is picked from the URL scheme:
///
/// - `memory://` → [`InMemoryRateStore`]
/// - `sqlite:` → [`SqliteRateStore`] (feature `sqlite`)
/// - `postgres:` / `postgresql:` → [`PostgresRateStore`] (feature `postgres`)
///
/// SQL backends connect and create their schema before returning.
///
/// ```ignore
/// let store = build_store("sqlite://data/rates.db?mode=rwc").await?;
/// ```
pub async fn build_store(database_url: &str) -> anyhow::Result<Arc<dyn RateStore>> {
    let scheme = database_url.split(':').next().unwrap_or_default();

    match scheme {
        "memory" => {
            tracing::warn!("Using in-memory rate store; rates are lost on restart");
            Ok(Arc::new(InMemoryRateStore::new()))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SqliteRateStore::new(database_url).await?)),
        #[cfg(feature = "postgres")]
        "postgres" | "postgresql" => Ok(Arc::new(PostgresRateStore::new(database_url).await?)),
        other => anyhow::bail!(
            "Unsupported database scheme {:?} (is the matching repo feature enabled?)",
            other
        ),
    }
}
