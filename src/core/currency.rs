//! Currency conversion abstractions

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateLookupError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request error for currency {currency}: {source}")]
    Request {
        currency: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error: {status} for currency {currency}")]
    Status {
        currency: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to parse JSON response for {currency}: {source}")]
    Malformed {
        currency: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("No rate found from {from} to {to}")]
    UnknownCurrency { from: String, to: String },
    #[error("Invalid rate {rate} from {from} to {to}")]
    InvalidRate { from: String, to: String, rate: f64 },
}

/// Looks up the rate converting one unit of `from` into `to`.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateLookupError>;
}
