//! Domain models for the rate resolver.

pub mod currency;
pub mod mode;
pub mod rate;

pub use currency::{BASE_CURRENCY, CurrencyCode};
pub use mode::ConsistencyMode;
pub use rate::RateRecord;
