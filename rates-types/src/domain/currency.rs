//! ISO-4217 style currency codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// The single base currency every rate is quoted against.
pub const BASE_CURRENCY: &str = "USD";

/// A normalized three-letter uppercase currency code.
///
/// Input is case-insensitive and trimmed; empty input means the base
/// currency. Any other shape is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::usd());
        }

        let code = trimmed.to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DomainError::InvalidCurrency(trimmed.to_string()));
        }

        Ok(Self(code))
    }

    /// The base currency (USD).
    pub fn usd() -> Self {
        Self(BASE_CURRENCY.to_string())
    }

    /// Returns true for the base currency.
    pub fn is_base(&self) -> bool {
        self.0 == BASE_CURRENCY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let code = CurrencyCode::parse("  krw ").unwrap();
        assert_eq!(code.as_str(), "KRW");
    }

    #[test]
    fn test_empty_input_defaults_to_usd() {
        assert!(CurrencyCode::parse("").unwrap().is_base());
        assert!(CurrencyCode::parse("   ").unwrap().is_base());
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!(matches!(
            CurrencyCode::parse("EURO"),
            Err(DomainError::InvalidCurrency(_))
        ));
        assert!(CurrencyCode::parse("E1R").is_err());
        assert!(CurrencyCode::parse("€").is_err());
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let code: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(code.to_string(), "GBP");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GBP\"");
    }
}
