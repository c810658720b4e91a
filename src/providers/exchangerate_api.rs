use crate::core::currency::{CurrencyRateProvider, RateLookupError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Client for the exchangerate-api.com `latest` table.
///
/// One request per lookup; rates are not cached between calls.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RateTableResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateLookupError> {
        let url = format!("{}/v4/latest/{}", self.base_url, from);
        debug!("Requesting rate table from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("xpense/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RateLookupError::Client)?;

        let response =
            client
                .get(&url)
                .send()
                .await
                .map_err(|source| RateLookupError::Request {
                    currency: from.to_string(),
                    source,
                })?;

        if !response.status().is_success() {
            return Err(RateLookupError::Status {
                currency: from.to_string(),
                status: response.status(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| RateLookupError::Request {
                currency: from.to_string(),
                source,
            })?;

        let data: RateTableResponse =
            serde_json::from_str(&text).map_err(|source| RateLookupError::Malformed {
                currency: from.to_string(),
                source,
            })?;
        debug!(count = data.rates.len(), "Received rate table");

        let rate = *data
            .rates
            .get(to)
            .ok_or_else(|| RateLookupError::UnknownCurrency {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateLookupError::InvalidRate {
                from: from.to_string(),
                to: to.to_string(),
                rate,
            });
        }

        Ok(rate)
    }
}
