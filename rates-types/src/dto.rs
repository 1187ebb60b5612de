//! Data Transfer Objects (DTOs) for requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ConsistencyMode, CurrencyCode};

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for a single rate lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RateQuery {
    /// Consistency mode; defaults to non-strict
    #[serde(default)]
    #[param(inline)]
    pub mode: ConsistencyMode,
}

/// A resolved USD → currency rate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    #[schema(value_type = String, example = "EUR")]
    pub base: CurrencyCode,
    #[schema(value_type = String, example = "EUR")]
    pub currency: CurrencyCode,
    /// Units of `currency` per 1 USD
    #[schema(value_type = String, example = "0.92")]
    pub rate: Decimal,
    pub mode: ConsistencyMode,
}

/// Every rate currently known to the persistent store or the in-process cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CachedRatesResponse {
    #[schema(value_type = BTreeMap<String, String>)]
    pub rates: BTreeMap<CurrencyCode, Decimal>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Which way an amount is converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConversionDirection {
    /// USD amount in, local amount out
    #[default]
    FromUsd,
    /// Local amount in, USD amount out
    ToUsd,
}

/// Query parameters for a conversion.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversionQuery {
    /// Amount to convert
    #[param(value_type = String, example = "1000.50")]
    pub amount: Decimal,
    /// Local currency of the conversion
    #[param(example = "EUR")]
    pub currency: String,
    #[serde(default)]
    #[param(inline)]
    pub direction: ConversionDirection,
    #[serde(default)]
    #[param(inline)]
    pub mode: ConsistencyMode,
}

/// Result of a conversion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionResponse {
    #[schema(value_type = String, example = "1000.50")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "EUR")]
    pub currency: CurrencyCode,
    pub direction: ConversionDirection,
    #[schema(value_type = String, example = "920.46")]
    pub converted: Decimal,
    pub mode: ConsistencyMode,
}
