//! TwelveData price-history provider.
//!
//! Fetches monthly closes from the `/time_series` endpoint. The API returns
//! values newest first with prices encoded as strings; this adapter hands
//! them back oldest first as numbers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::provider::{PriceHistoryProvider, PriceObservation};
use crate::config::ProviderConfig;
use crate::error::ProviderError;

const PROVIDER_ID: &str = "TWELVE_DATA";

/// Response from /time_series
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    /// "ok" or "error"
    #[serde(default)]
    status: Option<String>,
    /// Present on errors
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Vec<TimeSeriesValue>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    /// "2024-05-01" or "2024-05-01 15:30:00"
    datetime: String,
    close: String,
}

/// TwelveData provider configured from [`ProviderConfig`]
pub struct TwelveDataProvider {
    client: Client,
    config: ProviderConfig,
}

impl TwelveDataProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    async fn fetch(&self, symbol: &str, api_key: &str) -> Result<String, ProviderError> {
        let url = format!("{}/time_series", self.config.base_url.trim_end_matches('/'));
        let output_size = self.config.output_size.to_string();

        debug!(
            "TwelveData request: {} interval={} outputsize={}",
            symbol, self.config.interval, output_size
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("apikey {}", api_key))
            .query(&[
                ("symbol", symbol),
                ("interval", self.config.interval.as_str()),
                ("outputsize", output_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    ProviderError::Network {
                        provider: PROVIDER_ID.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProviderError::Network {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;

        check_status(status, body)
    }
}

#[async_trait]
impl PriceHistoryProvider for TwelveDataProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn price_history(&self, symbol: &str) -> Result<Vec<PriceObservation>, ProviderError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(ProviderError::MissingCredentials {
                    provider: PROVIDER_ID.to_string(),
                })
            }
        };

        let symbol = symbol.trim().to_uppercase();
        let body = self.fetch(&symbol, api_key).await?;
        let observations = parse_time_series(&body, &symbol)?;

        if observations.iter().any(|o| o.close.is_nan()) {
            warn!("TwelveData returned unparseable closes for {}", symbol);
        }

        Ok(observations)
    }
}

/// Decode a /time_series body into ascending observations
fn parse_time_series(body: &str, symbol: &str) -> Result<Vec<PriceObservation>, ProviderError> {
    let response: TimeSeriesResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;

    if response.status.as_deref() == Some("error") {
        return Err(ProviderError::Api {
            provider: PROVIDER_ID.to_string(),
            message: response
                .message
                .unwrap_or_else(|| format!("No time series data for {}.", symbol)),
        });
    }

    let mut observations = response
        .values
        .iter()
        .map(|value| {
            let timestamp = parse_date(&value.datetime).ok_or_else(|| ProviderError::Malformed {
                provider: PROVIDER_ID.to_string(),
                message: format!("bad datetime: {}", value.datetime),
            })?;
            let close = value.close.trim().parse::<f64>().unwrap_or(f64::NAN);
            Ok(PriceObservation::new(timestamp, close))
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    observations.sort_by_key(|o| o.timestamp);
    Ok(observations)
}

fn parse_date(datetime: &str) -> Option<NaiveDate> {
    let date_part = datetime.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Map a non-success HTTP status to its error; pass the body through otherwise
fn check_status(status: StatusCode, body: String) -> Result<String, ProviderError> {
    if status.is_success() {
        return Ok(body);
    }

    let provider = PROVIDER_ID.to_string();
    Err(match status {
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized { provider },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { provider },
        _ => ProviderError::Status {
            provider,
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| "Request failed".to_string()),
        },
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<TimeSeriesResponse>(body)
        .ok()
        .and_then(|r| r.message)
}
