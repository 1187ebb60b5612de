//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use rates_types::domain::ConsistencyMode;
use rates_types::dto::{
    CachedRatesResponse, ConversionDirection, ConversionQuery, ConversionResponse, RateQuery,
    RateResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List every known rate (persistent store overlaid with the in-process cache)
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Known USD-based rates", body = CachedRatesResponse)
    )
)]
async fn list_rates() {}

/// Resolve the USD → currency rate
#[utoipa::path(
    get,
    path = "/api/rates/{currency}",
    tag = "rates",
    params(
        ("currency" = String, Path, description = "ISO-4217 code, case-insensitive", example = "EUR"),
        RateQuery
    ),
    responses(
        (status = 200, description = "Resolved rate", body = RateResponse),
        (status = 400, description = "Malformed currency code or query"),
        (status = 409, description = "Strict mode: rate not from the authoritative provider"),
        (status = 503, description = "Strict mode: rate stale or unavailable")
    )
)]
async fn get_rate() {}

/// Convert an amount to or from USD
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "conversions",
    params(ConversionQuery),
    responses(
        (status = 200, description = "Converted amount", body = ConversionResponse),
        (status = 400, description = "Malformed amount, currency code or query"),
        (status = 409, description = "Strict mode: rate not from the authoritative provider"),
        (status = 503, description = "Strict mode: rate stale or unavailable")
    )
)]
async fn convert() {}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Rate Service API",
        version = "1.0.0",
        description = "Read-only USD-based exchange rates resolved through in-process, distributed and persistent tiers.\n\n## Consistency modes\n\n`non-strict` (default) always answers, degrading to stale data or identity. `strict` refuses stale, missing or non-authoritative rates.",
        license(name = "MIT"),
    ),
    paths(health, list_rates, get_rate, convert),
    components(
        schemas(
            RateResponse,
            CachedRatesResponse,
            ConversionResponse,
            ConversionDirection,
            ConsistencyMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Rate lookups"),
        (name = "conversions", description = "Amount conversions"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/rates", "/api/rates/{currency}", "/api/convert"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
