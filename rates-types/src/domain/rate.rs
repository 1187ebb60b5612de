//! The canonical rate record shared by every tier.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::{BASE_CURRENCY, CurrencyCode};
use crate::error::DomainError;

/// An observed USD → target exchange rate.
///
/// Records are immutable once built: "updating" a rate means producing a
/// new record and storing it over the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateRecordRepr", into = "RateRecordRepr")]
pub struct RateRecord {
    target: CurrencyCode,
    rate: Decimal,
    captured_at: DateTime<Utc>,
    provider: String,
    observed_on: Option<NaiveDate>,
}

impl RateRecord {
    /// Builds a validated record.
    ///
    /// The rate must be strictly positive and the target must not be the
    /// base currency (its rate is structurally 1).
    pub fn new(
        target: CurrencyCode,
        rate: Decimal,
        provider: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if target.is_base() {
            return Err(DomainError::BaseCurrencyRate);
        }
        if rate <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRate {
                currency: target,
                rate,
            });
        }

        Ok(Self {
            target,
            rate,
            captured_at,
            provider: provider.into(),
            observed_on: None,
        })
    }

    /// Attaches the upstream observation date.
    pub fn with_observed_on(mut self, date: NaiveDate) -> Self {
        self.observed_on = Some(date);
        self
    }

    pub fn base_currency(&self) -> &'static str {
        BASE_CURRENCY
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn observed_on(&self) -> Option<NaiveDate> {
        self.observed_on
    }

    /// Age of the record relative to `now`. Never negative.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let age = now.signed_duration_since(self.captured_at);
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    /// True if the record is no older than `window`.
    pub fn is_fresh_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) <= window
    }
}

/// Wire shape of a record; deserialization re-runs validation.
#[derive(Serialize, Deserialize)]
struct RateRecordRepr {
    #[serde(default = "base_currency")]
    base_currency: String,
    target_currency: CurrencyCode,
    rate: Decimal,
    captured_at: DateTime<Utc>,
    provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observed_on: Option<NaiveDate>,
}

fn base_currency() -> String {
    BASE_CURRENCY.to_string()
}

impl TryFrom<RateRecordRepr> for RateRecord {
    type Error = DomainError;

    fn try_from(repr: RateRecordRepr) -> Result<Self, Self::Error> {
        if !repr.base_currency.eq_ignore_ascii_case(BASE_CURRENCY) {
            return Err(DomainError::UnsupportedBase(repr.base_currency));
        }
        let record = RateRecord::new(
            repr.target_currency,
            repr.rate,
            repr.provider,
            repr.captured_at,
        )?;
        Ok(match repr.observed_on {
            Some(date) => record.with_observed_on(date),
            None => record,
        })
    }
}

impl From<RateRecord> for RateRecordRepr {
    fn from(record: RateRecord) -> Self {
        Self {
            base_currency: base_currency(),
            target_currency: record.target,
            rate: record.rate,
            captured_at: record.captured_at,
            provider: record.provider,
            observed_on: record.observed_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur() -> CurrencyCode {
        CurrencyCode::parse("EUR").unwrap()
    }

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = RateRecord::new(eur(), dec!(0.92), "fixed", now).unwrap();
        assert_eq!(record.target().as_str(), "EUR");
        assert_eq!(record.rate(), dec!(0.92));
        assert_eq!(record.base_currency(), "USD");
        assert_eq!(record.provider(), "fixed");
        assert!(record.observed_on().is_none());
    }

    #[test]
    fn test_non_positive_rate_fails() {
        let now = Utc::now();
        assert!(matches!(
            RateRecord::new(eur(), Decimal::ZERO, "fixed", now),
            Err(DomainError::NonPositiveRate { .. })
        ));
        assert!(RateRecord::new(eur(), dec!(-1.5), "fixed", now).is_err());
    }

    #[test]
    fn test_base_currency_cannot_carry_a_rate() {
        let result = RateRecord::new(CurrencyCode::usd(), dec!(1), "fixed", Utc::now());
        assert!(matches!(result, Err(DomainError::BaseCurrencyRate)));
    }

    #[test]
    fn test_freshness_window() {
        let now = Utc::now();
        let record =
            RateRecord::new(eur(), dec!(0.92), "fixed", now - Duration::hours(48)).unwrap();
        assert!(!record.is_fresh_within(Duration::hours(24), now));
        assert!(record.is_fresh_within(Duration::hours(49), now));
    }

    #[test]
    fn test_future_capture_has_zero_age() {
        let now = Utc::now();
        let record =
            RateRecord::new(eur(), dec!(0.92), "fixed", now + Duration::minutes(5)).unwrap();
        assert_eq!(record.age(now), Duration::zero());
    }

    #[test]
    fn test_deserialization_validates_rate() {
        let json = r#"{
            "target_currency": "eur",
            "rate": "0",
            "captured_at": "2026-02-18T00:00:00Z",
            "provider": "fixed"
        }"#;
        assert!(serde_json::from_str::<RateRecord>(json).is_err());

        let json = r#"{
            "target_currency": "eur",
            "rate": "0.91",
            "captured_at": "2026-02-18T00:00:00Z",
            "provider": "fixed",
            "observed_on": "2026-02-18"
        }"#;
        let record: RateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.target().as_str(), "EUR");
        assert_eq!(record.observed_on(), NaiveDate::from_ymd_opt(2026, 2, 18));
    }
}
