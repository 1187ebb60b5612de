//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use rates_types::CurrencyCode;

/// The upstream feed for the restricted currency.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoritativeSettings {
    pub currency: CurrencyCode,
    pub provider_id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// In-memory L2 when absent.
    pub redis_url: Option<String>,
    pub l1_ttl: chrono::Duration,
    pub sync_interval: chrono::Duration,
    pub authoritative: Option<AuthoritativeSettings>,
    pub provider_timeout: Duration,
    pub enable_fixed_rates: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(&var, "PORT", 3000u16)?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let l1_ttl_secs = parse_or(&var, "RATE_L1_TTL_SECS", 300i64)?;
        let sync_interval_secs = parse_or(&var, "RATE_SYNC_INTERVAL_SECS", 86_400i64)?;
        if l1_ttl_secs <= 0 || sync_interval_secs <= 0 {
            anyhow::bail!("RATE_L1_TTL_SECS and RATE_SYNC_INTERVAL_SECS must be positive");
        }

        let authoritative = match (
            var("AUTHORITATIVE_CURRENCY"),
            var("AUTHORITATIVE_PROVIDER_ID"),
            var("AUTHORITATIVE_ENDPOINT"),
        ) {
            (None, None, None) => None,
            (Some(currency), Some(provider_id), Some(endpoint)) => Some(AuthoritativeSettings {
                currency: CurrencyCode::parse(&currency)
                    .context("AUTHORITATIVE_CURRENCY is not a currency code")?,
                provider_id,
                endpoint,
                api_key: var("AUTHORITATIVE_API_KEY"),
            }),
            _ => anyhow::bail!(
                "AUTHORITATIVE_CURRENCY, AUTHORITATIVE_PROVIDER_ID and AUTHORITATIVE_ENDPOINT must be set together"
            ),
        };

        let provider_timeout = Duration::from_secs(parse_or(&var, "PROVIDER_TIMEOUT_SECS", 10u64)?);
        let enable_fixed_rates = parse_or(&var, "ENABLE_FIXED_RATES", false)?;

        Ok(Self {
            port,
            database_url,
            redis_url: var("REDIS_URL"),
            l1_ttl: chrono::Duration::seconds(l1_ttl_secs),
            sync_interval: chrono::Duration::seconds(sync_interval_secs),
            authoritative,
            provider_timeout,
            enable_fixed_rates,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
