//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use crate::RateResolver;

/// HTTP Server for the rates API.
pub struct HttpServer {
    state: Arc<AppState>,
}

impl HttpServer {
    /// Creates a new HTTP server over the given resolver.
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self {
            state: Arc::new(AppState { resolver }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_origin(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/rates", get(handlers::list_rates))
            .route("/api/rates/{currency}", get(handlers::get_rate))
            .route("/api/convert", get(handlers::convert))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rates_repo::{InMemoryDistributedCache, InMemoryRateStore};
    use rates_types::{CurrencyCode, RateRecord, RateStore};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use exchange_rates::FixedRateProvider;

    use crate::{InProcessRateCache, ResolverConfig};

    fn app_with(store: Arc<InMemoryRateStore>) -> Router {
        let config = ResolverConfig::default()
            .with_restricted_currency(CurrencyCode::parse("KRW").unwrap(), "central-bank");
        let provider = FixedRateProvider::new("fixed")
            .with_rate(CurrencyCode::parse("EUR").unwrap(), dec!(0.92))
            .with_rate(CurrencyCode::parse("KRW").unwrap(), dec!(1340));
        let resolver = RateResolver::new(
            Arc::new(InProcessRateCache::new()),
            Arc::new(InMemoryDistributedCache::new(config.sync_interval)),
            store,
            Arc::new(provider),
            config,
        );
        HttpServer::new(Arc::new(resolver)).router()
    }

    fn app() -> Router {
        app_with(Arc::new(InMemoryRateStore::new()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn converted(body: &serde_json::Value) -> rust_decimal::Decimal {
        body["converted"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_get_rate() {
        let (status, body) = get_json(app(), "/api/rates/eur?mode=strict").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["base"], "USD");
        assert_eq!(body["currency"], "EUR");
        assert_eq!(body["rate"], "0.92");
        assert_eq!(body["mode"], "strict");
    }

    #[tokio::test]
    async fn test_mode_defaults_to_non_strict() {
        let (status, body) = get_json(app(), "/api/rates/KRW").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rate"], "1340");
        assert_eq!(body["mode"], "non-strict");
    }

    #[tokio::test]
    async fn test_untrusted_source_is_conflict() {
        let (status, body) = get_json(app(), "/api/rates/KRW?mode=strict").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);
    }

    #[tokio::test]
    async fn test_unavailable_is_service_unavailable() {
        let (status, _) = get_json(app(), "/api/rates/CHF?mode=strict").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let (status, body) = get_json(app(), "/api/rates/EURO").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, _) = get_json(app(), "/api/rates/EUR?mode=sometimes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/convert?amount=abc&currency=EUR").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_convert_both_directions() {
        let (status, body) =
            get_json(app(), "/api/convert?amount=100&currency=EUR&direction=from_usd").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(converted(&body), dec!(92));
        assert_eq!(body["direction"], "from_usd");

        let (status, body) =
            get_json(app(), "/api/convert?amount=92&currency=eur&direction=to_usd").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currency"], "EUR");
        assert_eq!(converted(&body), dec!(100));
    }

    #[tokio::test]
    async fn test_list_rates() {
        let store = Arc::new(InMemoryRateStore::new());
        let gbp = RateRecord::new(
            CurrencyCode::parse("GBP").unwrap(),
            dec!(0.79),
            "fixed",
            chrono::Utc::now(),
        )
        .unwrap();
        store.put(&gbp).await.unwrap();

        let (status, body) = get_json(app_with(store), "/api/rates").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rates"]["GBP"], "0.79");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let (status, body) = get_json(app(), "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/rates/{currency}"].is_object());
        assert!(body["paths"]["/api/convert"].is_object());
    }
}
