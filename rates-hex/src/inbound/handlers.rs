//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rates_types::{
    BASE_CURRENCY, CachedRatesResponse, ConversionDirection, ConversionQuery,
    ConversionResponse, CurrencyCode, RateQuery, RateResponse, ResolveError,
};

use crate::RateResolver;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState {
    pub resolver: Arc<RateResolver>,
}

/// Errors surfaced over HTTP.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Resolve(ResolveError),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        ApiError::Resolve(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Resolve(err) => match err {
                ResolveError::InvalidCurrency(_) | ResolveError::ConversionOverflow { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ResolveError::UntrustedSource { .. } => StatusCode::CONFLICT,
                ResolveError::RateStale { .. } | ResolveError::RateUnavailable { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        };
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Resolve(err) => err.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Every rate currently held by the store or the in-process cache.
#[tracing::instrument(skip(state))]
pub async fn list_rates(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rates = state.resolver.list_cached_rates().await;
    Json(CachedRatesResponse { rates })
}

/// Resolve one USD → currency rate.
#[tracing::instrument(skip(state, query))]
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Path(currency): Path<String>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let code = CurrencyCode::parse(&currency).map_err(ResolveError::from)?;

    let rate = state.resolver.resolve(code.as_str(), query.mode).await?;

    Ok(Json(RateResponse {
        base: CurrencyCode::usd(),
        currency: code,
        rate,
        mode: query.mode,
    }))
}

/// Convert an amount to or from USD.
#[tracing::instrument(skip(state, query))]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConversionQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let code = CurrencyCode::parse(&query.currency).map_err(ResolveError::from)?;
    tracing::debug!(amount = %query.amount, currency = %code, base = BASE_CURRENCY, "Converting");

    let converted = match query.direction {
        ConversionDirection::FromUsd => {
            state
                .resolver
                .convert_from_usd(query.amount, code.as_str(), query.mode)
                .await?
        }
        ConversionDirection::ToUsd => {
            state
                .resolver
                .convert_to_usd(query.amount, code.as_str(), query.mode)
                .await?
        }
    };

    Ok(Json(ConversionResponse {
        amount: query.amount,
        currency: code,
        direction: query.direction,
        converted,
        mode: query.mode,
    }))
}

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}
