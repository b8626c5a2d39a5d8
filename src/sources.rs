use crate::config::Config;
use crate::errors::AppError;
use crate::models::{RatePayload, RawCountry};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Client for the two external data sources the refresh pipeline depends on.
///
/// URLs and the fetch timeout come from [`Config`] so tests can point the
/// client at a mock server. There is no retry logic: any network error,
/// timeout, or non-2xx response is a uniform [`AppError::SourceUnavailable`]
/// and aborts the pipeline before storage is touched.
pub struct SourceClient {
    client: Client,
    country_url: String,
    exchange_url: String,
}

impl SourceClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            country_url: config.country_api_url.clone(),
            exchange_url: config.exchange_api_url.clone(),
        })
    }

    /// Fetch a URL and parse the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("External source {} returned status {}", url, status);
            return Err(AppError::SourceUnavailable(format!(
                "{} returned status {}",
                url, status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Invalid JSON from {}: {}", url, e)))
    }

    /// Fetch the country list. The payload must be list-shaped; anything else
    /// counts as a malformed source.
    pub async fn fetch_countries(&self) -> Result<Vec<RawCountry>, AppError> {
        let payload = self.fetch_json(&self.country_url).await?;

        if !payload.is_array() {
            return Err(AppError::SourceUnavailable(
                "Country payload is not a list".to_string(),
            ));
        }

        let countries: Vec<RawCountry> = serde_json::from_value(payload).map_err(|e| {
            AppError::SourceUnavailable(format!("Malformed country payload: {}", e))
        })?;

        tracing::info!("Fetched {} countries from source", countries.len());
        Ok(countries)
    }

    /// Fetch the exchange-rate table. A payload without a usable `rates`
    /// member yields an empty table, not a failure.
    pub async fn fetch_rates(&self) -> Result<HashMap<String, f64>, AppError> {
        let payload = self.fetch_json(&self.exchange_url).await?;

        let rates = serde_json::from_value::<RatePayload>(payload)
            .map(|p| p.rates)
            .unwrap_or_default();

        tracing::info!("Fetched {} exchange rates from source", rates.len());
        Ok(rates)
    }
}
