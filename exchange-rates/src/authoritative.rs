//! HTTP client for the single authoritative provider of a restricted currency.

use async_trait::async_trait;
use chrono::Utc;
use rates_types::{CurrencyCode, LiveRateProvider, ProviderError, RateRecord};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::payload::{RateObservation, select_latest};

/// Settings for the authoritative upstream feed.
#[derive(Debug, Clone)]
pub struct AuthoritativeConfig {
    /// The restricted currency this feed is authoritative for.
    pub currency: CurrencyCode,
    /// Identifier stamped on every record; trust checks compare against it.
    pub provider_id: String,
    /// Fixed GET endpoint returning the list of dated observations.
    pub endpoint: String,
    /// Sent as the `authkey` query parameter when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AuthoritativeConfig {
    pub fn new(
        currency: CurrencyCode,
        provider_id: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            currency,
            provider_id: provider_id.into(),
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches the latest authoritative rate for one currency.
pub struct AuthoritativeClient {
    config: AuthoritativeConfig,
    http: Client,
}

impl AuthoritativeClient {
    /// Creates a new client.
    pub fn new(config: AuthoritativeConfig) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.config.currency
    }

    pub fn provider_id(&self) -> &str {
        &self.config.provider_id
    }

    async fn fetch_observations(&self) -> Result<Vec<RateObservation>, ProviderError> {
        let currency = &self.config.currency;

        let mut req = self.http.get(&self.config.endpoint);
        if let Some(key) = &self.config.api_key {
            req = req.query(&[("authkey", key)]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ProviderError::fetch_failed(currency, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::fetch_failed(
                currency,
                format!("upstream returned HTTP {}", status),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::fetch_failed(currency, e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            debug!(response = %body, "Unparseable upstream payload");
            ProviderError::fetch_failed(currency, format!("malformed payload: {}", e))
        })
    }
}

#[async_trait]
impl LiveRateProvider for AuthoritativeClient {
    fn name(&self) -> &str {
        &self.config.provider_id
    }

    fn supports(&self, currency: &CurrencyCode) -> bool {
        *currency == self.config.currency
    }

    #[instrument(skip(self), fields(provider = %self.config.provider_id))]
    async fn fetch_live(&self, currency: &CurrencyCode) -> Result<RateRecord, ProviderError> {
        if !self.supports(currency) {
            return Err(ProviderError::Unconfigured(currency.clone()));
        }

        let observations = self.fetch_observations().await?;
        let selected = select_latest(&observations).map_err(|e| {
            warn!(error = %e, "Rejected upstream payload");
            ProviderError::fetch_failed(currency, e.to_string())
        })?;

        let record = RateRecord::new(
            currency.clone(),
            selected.rate,
            self.config.provider_id.clone(),
            Utc::now(),
        )
        .map_err(|e| ProviderError::fetch_failed(currency, e.to_string()))?
        .with_observed_on(selected.date);

        info!(rate = %record.rate(), observed_on = %selected.date, "Fetched live rate");
        Ok(record)
    }
}
