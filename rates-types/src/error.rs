//! Error types for the rate resolver.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::CurrencyCode;

/// Domain-level errors (validation failures).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Rate for {currency} must be positive, got {rate}")]
    NonPositiveRate { currency: CurrencyCode, rate: Decimal },

    #[error("The base currency always converts at exactly 1")]
    BaseCurrencyRate,

    #[error("Unsupported base currency: {0}")]
    UnsupportedBase(String),
}

/// Persistent store errors. Recoverable from the resolver's point of view.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt rate row: {0}")]
    Decode(String),
}

/// Distributed cache errors. Recoverable from the resolver's point of view.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache payload error: {0}")]
    Serialization(String),
}

/// Live rate provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// No live source exists for the currency. Never retried.
    #[error("No provider configured for {0}")]
    Unconfigured(CurrencyCode),

    /// Network, status or payload failure. Retried only by the next call.
    #[error("Rate fetch failed for {currency}: {reason}")]
    FetchFailed {
        currency: CurrencyCode,
        reason: String,
    },
}

impl ProviderError {
    pub fn fetch_failed(currency: &CurrencyCode, reason: impl Into<String>) -> Self {
        ProviderError::FetchFailed {
            currency: currency.clone(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by `resolve` and the conversion helpers.
///
/// Only `InvalidCurrency` can occur in non-strict mode; the remaining
/// variants are strict-mode refusals and callers must treat them as
/// "do not proceed".
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidCurrency(#[from] DomainError),

    #[error("Rate for {currency} is stale (captured at {captured_at})")]
    RateStale {
        currency: CurrencyCode,
        captured_at: DateTime<Utc>,
    },

    #[error("No rate available for {currency}")]
    RateUnavailable {
        currency: CurrencyCode,
        #[source]
        source: ProviderError,
    },

    #[error("Rate for {currency} came from {provider}, expected {expected}")]
    UntrustedSource {
        currency: CurrencyCode,
        provider: String,
        expected: String,
    },

    #[error("Converting {amount} with {currency} overflows")]
    ConversionOverflow {
        amount: Decimal,
        currency: CurrencyCode,
    },
}

impl ResolveError {
    /// The currency the failed resolution was for, when known.
    pub fn currency(&self) -> Option<&CurrencyCode> {
        match self {
            ResolveError::InvalidCurrency(_) => None,
            ResolveError::RateStale { currency, .. }
            | ResolveError::RateUnavailable { currency, .. }
            | ResolveError::UntrustedSource { currency, .. }
            | ResolveError::ConversionOverflow { currency, .. } => Some(currency),
        }
    }
}

/// Errors from an explicit rate write.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
