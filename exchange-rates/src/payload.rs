//! Upstream payload parsing for the authoritative rate feed.
//!
//! The feed returns a JSON array of dated observations. The array is not
//! guaranteed to be sorted, dates come in more than one format, and the
//! numeric value may sit in either of two fields, as a number or as a
//! string with thousands separators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

const DATE_FORMATS: &[&str] = &["%B-%d-%Y", "%b-%d-%Y", "%Y-%m-%d"];

/// One dated observation as returned by the upstream feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateObservation {
    #[serde(default)]
    pub date: Option<String>,
    /// Preferred numeric field.
    #[serde(default)]
    pub rate: Option<Value>,
    /// Used when `rate` is missing or unusable.
    #[serde(default)]
    pub fallback_rate: Option<Value>,
}

/// The observation chosen from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRate {
    pub date: NaiveDate,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("upstream returned no observations")]
    Empty,

    #[error("none of the {0} observations carries a parseable date")]
    NoParseableDate(usize),

    #[error("observation dated {0} has no numeric rate")]
    MissingRate(NaiveDate),

    #[error("observation dated {date} has non-positive rate {rate}")]
    NonPositiveRate { date: NaiveDate, rate: Decimal },
}

/// Parses `January-26-2026` style or ISO `2026-01-26` dates.
pub fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parses a JSON number or numeric string into a decimal.
fn parse_rate_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

impl RateObservation {
    fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_observation_date)
    }

    /// Picks the first positive value, preferring `rate` over `fallback_rate`.
    fn resolve_rate(&self, date: NaiveDate) -> Result<Decimal, PayloadError> {
        let candidates: Vec<Decimal> = [&self.rate, &self.fallback_rate]
            .into_iter()
            .flatten()
            .filter_map(parse_rate_value)
            .collect();

        if let Some(rate) = candidates.iter().find(|r| **r > Decimal::ZERO) {
            return Ok(*rate);
        }
        match candidates.first() {
            Some(rate) => Err(PayloadError::NonPositiveRate { date, rate: *rate }),
            None => Err(PayloadError::MissingRate(date)),
        }
    }
}

/// Selects the most recently dated observation, whatever its position.
pub fn select_latest(observations: &[RateObservation]) -> Result<SelectedRate, PayloadError> {
    if observations.is_empty() {
        return Err(PayloadError::Empty);
    }

    let (date, latest) = observations
        .iter()
        .filter_map(|obs| obs.parsed_date().map(|date| (date, obs)))
        .max_by_key(|(date, _)| *date)
        .ok_or(PayloadError::NoParseableDate(observations.len()))?;

    let rate = latest.resolve_rate(date)?;
    Ok(SelectedRate { date, rate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn obs(date: &str, rate: Value) -> RateObservation {
        RateObservation {
            date: Some(date.to_string()),
            rate: Some(rate),
            fallback_rate: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_both_date_formats() {
        assert_eq!(parse_observation_date("January-26-2026"), Some(ymd(2026, 1, 26)));
        assert_eq!(parse_observation_date("Feb-18-2026"), Some(ymd(2026, 2, 18)));
        assert_eq!(parse_observation_date(" 2026-02-18 "), Some(ymd(2026, 2, 18)));
        assert_eq!(parse_observation_date("18/02/2026"), None);
    }

    #[test]
    fn test_selects_latest_date_not_last_element() {
        let payload = vec![
            obs("2026-02-10", json!("1350.10")),
            obs("2026-02-18", json!("1338.1066")),
            obs("2026-01-26", json!("1418.9522")),
        ];

        let selected = select_latest(&payload).unwrap();

        assert_eq!(selected.date, ymd(2026, 2, 18));
        assert_eq!(selected.rate, dec!(1338.1066));
    }

    #[test]
    fn test_month_name_scenario() {
        let payload = vec![
            obs("January-26-2026", json!("1418.9522")),
            obs("February-18-2026", json!("1338.1066")),
        ];

        let selected = select_latest(&payload).unwrap();

        assert_eq!(selected.rate, dec!(1338.1066));
        assert_eq!(selected.date, ymd(2026, 2, 18));
    }

    #[test]
    fn test_falls_back_to_second_field() {
        let payload = vec![RateObservation {
            date: Some("2026-02-18".into()),
            rate: Some(json!("")),
            fallback_rate: Some(json!("1,338.10")),
        }];

        assert_eq!(select_latest(&payload).unwrap().rate, dec!(1338.10));
    }

    #[test]
    fn test_accepts_numeric_json_values() {
        let payload = vec![obs("2026-02-18", json!(1338.5))];
        assert_eq!(select_latest(&payload).unwrap().rate, dec!(1338.5));
    }

    #[test]
    fn test_skips_unparseable_dates() {
        let payload = vec![
            obs("not a date", json!("9999")),
            obs("2026-01-02", json!("1400")),
        ];
        assert_eq!(select_latest(&payload).unwrap().rate, dec!(1400));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert_eq!(select_latest(&[]), Err(PayloadError::Empty));
    }

    #[test]
    fn test_rejects_payload_without_dates() {
        let payload = vec![obs("soon", json!("1")), RateObservation::default()];
        assert_eq!(select_latest(&payload), Err(PayloadError::NoParseableDate(2)));
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        let payload = vec![obs("2026-02-18", json!("0"))];
        assert!(matches!(
            select_latest(&payload),
            Err(PayloadError::NonPositiveRate { .. })
        ));

        let payload = vec![obs("2026-02-18", json!(-3))];
        assert!(matches!(
            select_latest(&payload),
            Err(PayloadError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_rate_on_latest() {
        let payload = vec![
            obs("2026-01-01", json!("1400")),
            RateObservation {
                date: Some("2026-02-01".into()),
                rate: Some(json!("n/a")),
                fallback_rate: None,
            },
        ];
        assert_eq!(
            select_latest(&payload),
            Err(PayloadError::MissingRate(ymd(2026, 2, 1)))
        );
    }
}
