//! Live Exchange-Rate Providers
//!
//! Adapters implementing the `LiveRateProvider` port:
//!
//! - [`AuthoritativeClient`] - HTTP client for the single authoritative feed
//!   of a restricted currency. Picks the most recently dated observation from
//!   an unsorted payload and rejects empty, undated or non-positive data.
//! - [`FixedRateProvider`] - rates from an in-memory table, for development
//!   and operator-managed currencies.
//! - [`ProviderRegistry`] - routes each currency to the provider that
//!   supports it; everything else is `ProviderError::Unconfigured`.
//!
//! # Example
//! ```ignore
//! use exchange_rates::{AuthoritativeClient, AuthoritativeConfig, ProviderRegistry};
//! use rates_types::{CurrencyCode, LiveRateProvider};
//! use std::sync::Arc;
//!
//! let krw = CurrencyCode::parse("KRW")?;
//! let client = AuthoritativeClient::new(AuthoritativeConfig::new(
//!     krw.clone(),
//!     "central-bank",
//!     "https://rates.example.com/v1/exchange",
//! ))?;
//! let providers = ProviderRegistry::new().with_provider(Arc::new(client));
//!
//! let record = providers.fetch_live(&krw).await?;
//! ```

pub mod authoritative;
pub mod fixed;
pub mod payload;
pub mod registry;

pub use authoritative::{AuthoritativeClient, AuthoritativeConfig};
pub use fixed::{FIXED_PROVIDER, FixedRateProvider};
pub use payload::{PayloadError, RateObservation, SelectedRate, select_latest};
pub use registry::ProviderRegistry;
