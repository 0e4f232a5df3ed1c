use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::currency::{BASE_CURRENCY, ExchangeRateTable};
use crate::core::exchange::RateSource;

/// Rate source backed by the exchangerate-api.com `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tripledger/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: HashMap<String, f64>,
}

fn to_decimal(rate: f64) -> Option<Decimal> {
    // Go through the shortest decimal representation to avoid binary noise.
    Decimal::from_str(&rate.to_string()).ok()
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<ExchangeRateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, BASE_CURRENCY);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let data: LatestRatesResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse exchange rate response"
                );
                return Err(anyhow!("Failed to parse JSON response from {}: {}", url, e));
            }
        };

        if let Some(base) = &data.base {
            if !base.eq_ignore_ascii_case(BASE_CURRENCY) {
                return Err(anyhow!("Unexpected base currency: {}", base));
            }
        }
        if data.rates.is_empty() {
            return Err(anyhow!("No exchange rates in response from {}", url));
        }

        let table = ExchangeRateTable::new(
            data.rates
                .into_iter()
                .filter_map(|(code, rate)| to_decimal(rate).map(|rate| (code, rate))),
        );
        debug!(currencies = table.len(), "Parsed exchange rates");
        Ok(table)
    }
}
