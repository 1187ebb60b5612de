//! # Rates Types
//!
//! Domain types and port traits for the currency-rate resolution service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, RateRecord, ConsistencyMode)
//! - `ports/` - Trait definitions that tier adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, adapter and resolution error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{BASE_CURRENCY, ConsistencyMode, CurrencyCode, RateRecord};
pub use dto::*;
pub use error::{
    CacheError, DomainError, ProviderError, RecordError, ResolveError, StoreError,
};
pub use ports::{DistributedCache, LiveRateProvider, RateStore};
