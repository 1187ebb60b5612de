//! End-to-end resolver tests over real adapters.
//!
//! SQLite store, in-memory distributed cache and the authoritative HTTP
//! client pointed at a wiremock upstream.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use std::sync::Arc;

use chrono::{Duration, Utc};
use exchange_rates::{AuthoritativeClient, AuthoritativeConfig, FixedRateProvider, ProviderRegistry};
use rates_hex::{InProcessRateCache, RateResolver, ResolverConfig};
use rates_repo::{InMemoryDistributedCache, SqliteRateStore};
use rates_types::{ConsistencyMode, CurrencyCode, RateRecord, RateStore, ResolveError};
use rust_decimal_macros::dec;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_PATH: &str = "/v1/exchange";
const AUTHORITY: &str = "central-bank";

fn krw() -> CurrencyCode {
    CurrencyCode::parse("KRW").unwrap()
}

struct Stack {
    resolver: RateResolver,
    store: Arc<SqliteRateStore>,
    l1: Arc<InProcessRateCache>,
}

/// Wires the full stack; KRW goes to the upstream, EUR to a fixed table.
async fn create_stack(upstream: &MockServer) -> Stack {
    let config = ResolverConfig::default().with_restricted_currency(krw(), AUTHORITY);

    let authoritative = AuthoritativeClient::new(AuthoritativeConfig::new(
        krw(),
        AUTHORITY,
        format!("{}{}", upstream.uri(), FEED_PATH),
    ))
    .unwrap();
    let fixed =
        FixedRateProvider::new("fixed").with_rate(CurrencyCode::parse("EUR").unwrap(), dec!(0.92));
    let registry = ProviderRegistry::new()
        .with_provider(Arc::new(authoritative))
        .with_provider(Arc::new(fixed));

    let store = Arc::new(SqliteRateStore::new("sqlite::memory:").await.unwrap());
    let l1 = Arc::new(InProcessRateCache::new());
    let resolver = RateResolver::new(
        l1.clone(),
        Arc::new(InMemoryDistributedCache::new(config.sync_interval)),
        store.clone(),
        Arc::new(registry),
        config,
    );

    Stack {
        resolver,
        store,
        l1,
    }
}

async fn mount_feed(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_latest_observation_is_resolved_and_persisted() {
    let upstream = MockServer::start().await;
    mount_feed(
        &upstream,
        200,
        r#"[
            {"date": "January-26-2026", "rate": "1418.9522"},
            {"date": "February-18-2026", "rate": "1338.1066"}
        ]"#,
    )
    .await;
    let stack = create_stack(&upstream).await;

    let rate = stack
        .resolver
        .resolve("KRW", ConsistencyMode::Strict)
        .await
        .unwrap();

    assert_eq!(rate, dec!(1338.1066));
    let stored = stack.store.get(&krw()).await.unwrap().unwrap();
    assert_eq!(stored.rate(), dec!(1338.1066));
    assert_eq!(stored.provider(), AUTHORITY);

    // Served from L1 afterwards; the upstream is hit once.
    stack
        .resolver
        .resolve("krw", ConsistencyMode::Strict)
        .await
        .unwrap();
    assert_eq!(upstream.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stale_row_with_upstream_down() {
    let upstream = MockServer::start().await;
    mount_feed(&upstream, 503, "maintenance").await;
    let stack = create_stack(&upstream).await;

    let old = RateRecord::new(
        krw(),
        dec!(1400.50),
        AUTHORITY,
        Utc::now() - Duration::days(2),
    )
    .unwrap();
    stack.store.put(&old).await.unwrap();

    let lenient = stack
        .resolver
        .resolve("KRW", ConsistencyMode::NonStrict)
        .await
        .unwrap();
    let strict = stack.resolver.resolve("KRW", ConsistencyMode::Strict).await;

    assert_eq!(lenient, dec!(1400.50));
    assert!(matches!(strict, Err(ResolveError::RateStale { .. })));
}

#[tokio::test]
async fn test_unrestricted_currency_uses_secondary_provider() {
    let upstream = MockServer::start().await;
    let stack = create_stack(&upstream).await;

    let converted = stack
        .resolver
        .convert_from_usd(dec!(250), "EUR", ConsistencyMode::Strict)
        .await
        .unwrap();

    assert_eq!(converted, dec!(230));
    assert!(upstream.received_requests().await.unwrap().is_empty());
    assert_eq!(stack.store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_manual_rate_survives_l1_reset() {
    let upstream = MockServer::start().await;
    mount_feed(&upstream, 500, "").await;
    let stack = create_stack(&upstream).await;

    stack
        .resolver
        .record_rate("CHF", dec!(0.88), "treasury-desk")
        .await
        .unwrap();
    stack.l1.clear();

    let rate = stack
        .resolver
        .resolve("CHF", ConsistencyMode::Strict)
        .await
        .unwrap();
    let listed = stack.resolver.list_cached_rates().await;

    assert_eq!(rate, dec!(0.88));
    assert_eq!(listed[&CurrencyCode::parse("CHF").unwrap()], dec!(0.88));
}

#[tokio::test]
async fn test_unknown_currency_by_mode() {
    let upstream = MockServer::start().await;
    let stack = create_stack(&upstream).await;

    let lenient = stack
        .resolver
        .resolve("SEK", ConsistencyMode::NonStrict)
        .await
        .unwrap();
    let strict = stack.resolver.resolve("SEK", ConsistencyMode::Strict).await;

    assert_eq!(lenient, rust_decimal::Decimal::ONE);
    assert!(matches!(strict, Err(ResolveError::RateUnavailable { .. })));
}
