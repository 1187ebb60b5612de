//! Port traits (interfaces for adapters).
//!
//! These are the contracts that tier adapters must implement.
//! The resolver depends on these traits, not concrete implementations.

mod cache;
mod provider;
mod store;

pub use cache::DistributedCache;
pub use provider::LiveRateProvider;
pub use store::RateStore;
