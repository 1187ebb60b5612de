//! # Rates Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the persistent store and distributed cache adapters
//! - Register the live rate providers
//! - Create the resolver
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::{AuthoritativeClient, AuthoritativeConfig, FixedRateProvider, ProviderRegistry};
use rates_hex::{InProcessRateCache, RateResolver, ResolverConfig, inbound::HttpServer};
use rates_repo::{InMemoryDistributedCache, build_store};
use rates_types::DistributedCache;

use crate::config::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,rates_app=debug,rates_hex=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_distributed_cache(config: &Config) -> anyhow::Result<Arc<dyn DistributedCache>> {
    match &config.redis_url {
        #[cfg(feature = "redis")]
        Some(url) => {
            let cache = rates_repo::RedisRateCache::new(url, config.sync_interval).await?;
            tracing::info!("Using Redis distributed cache");
            Ok(Arc::new(cache))
        }
        #[cfg(not(feature = "redis"))]
        Some(_) => {
            tracing::warn!("REDIS_URL is set but the `redis` feature is disabled; using in-memory cache");
            Ok(Arc::new(InMemoryDistributedCache::new(config.sync_interval)))
        }
        None => {
            tracing::info!("Using in-memory distributed cache");
            Ok(Arc::new(InMemoryDistributedCache::new(config.sync_interval)))
        }
    }
}

fn build_providers(
    config: &Config,
    resolver_config: ResolverConfig,
) -> anyhow::Result<(ProviderRegistry, ResolverConfig)> {
    let mut registry = ProviderRegistry::new();
    let mut resolver_config = resolver_config;

    if let Some(auth) = &config.authoritative {
        let mut client_config =
            AuthoritativeConfig::new(auth.currency.clone(), &auth.provider_id, &auth.endpoint)
                .with_timeout(config.provider_timeout);
        if let Some(key) = &auth.api_key {
            client_config = client_config.with_api_key(key);
        }

        registry = registry.with_provider(Arc::new(AuthoritativeClient::new(client_config)?));
        resolver_config =
            resolver_config.with_restricted_currency(auth.currency.clone(), &auth.provider_id);
        tracing::info!(
            currency = %auth.currency,
            provider = %auth.provider_id,
            "Authoritative provider registered"
        );
    }

    if config.enable_fixed_rates {
        registry = registry.with_provider(Arc::new(FixedRateProvider::development()));
        tracing::info!("Fixed development rates enabled");
    }

    if registry.is_empty() {
        tracing::warn!("No live providers configured; only stored rates will resolve");
    }

    Ok((registry, resolver_config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting rates server on port {}", config.port);
    tracing::info!(
        "Using database backend: {}",
        config.database_url.split(':').next().unwrap_or_default()
    );

    // Build store (handles connection and migration)
    let store = build_store(&config.database_url).await?;
    let l2 = build_distributed_cache(&config).await?;

    let resolver_config = ResolverConfig::default()
        .with_l1_ttl(config.l1_ttl)
        .with_sync_interval(config.sync_interval);
    let (providers, resolver_config) = build_providers(&config, resolver_config)?;

    // Create the resolver
    let resolver = RateResolver::new(
        Arc::new(InProcessRateCache::new()),
        l2,
        store,
        Arc::new(providers),
        resolver_config,
    );

    // Create and run the HTTP server
    let server = HttpServer::new(Arc::new(resolver));
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
