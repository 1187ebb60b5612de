//! # Rates Hex
//!
//! Rate resolution service and HTTP adapter for the currency-rate service.
//!
//! ## Architecture
//!
//! - `service/` - The multi-tier resolver (orchestrates the tier ports)
//! - `tiers/` - One lookup per tier, sharing the `Lookup` result shape
//! - `l1/` - The in-process cache injected into the resolver
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The resolver depends only on the port traits from `rates-types`; the
//! concrete store, cache and provider adapters are injected at startup.

pub mod config;
pub mod inbound;
pub mod l1;
pub mod openapi;
pub mod service;
pub mod tiers;


pub use config::ResolverConfig;
pub use l1::InProcessRateCache;
pub use service::RateResolver;
