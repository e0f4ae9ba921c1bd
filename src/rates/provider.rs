//! Price-history provider trait and an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// One closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub timestamp: NaiveDate,
    /// May be NaN when the provider sent something unparseable
    pub close: f64,
}

impl PriceObservation {
    pub fn new(timestamp: NaiveDate, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Source of periodic closing prices for equities.
///
/// Implementations return observations ordered by timestamp ascending.
/// Transport problems are reported as [`ProviderError`]; the rate resolver
/// turns them into fallback rates.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Identifier used in logs and error messages
    fn id(&self) -> &'static str;

    /// Fetch the closing-price history for a symbol
    async fn price_history(&self, symbol: &str) -> Result<Vec<PriceObservation>, ProviderError>;
}

/// Price histories held in memory, keyed by upper-cased symbol.
///
/// Used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceHistory {
    series: HashMap<String, Vec<PriceObservation>>,
}

impl StaticPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series; observations are sorted by timestamp
    pub fn with_series(mut self, symbol: &str, mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        self.series.insert(symbol.trim().to_uppercase(), observations);
        self
    }

    /// Add a series of monthly closes starting at `start`
    pub fn with_monthly_closes(self, symbol: &str, start: NaiveDate, closes: &[f64]) -> Self {
        let observations = closes
            .iter()
            .enumerate()
            .filter_map(|(i, &close)| {
                start
                    .checked_add_months(chrono::Months::new(i as u32))
                    .map(|date| PriceObservation::new(date, close))
            })
            .collect();
        self.with_series(symbol, observations)
    }
}

#[async_trait]
impl PriceHistoryProvider for StaticPriceHistory {
    fn id(&self) -> &'static str {
        "STATIC"
    }

    async fn price_history(&self, symbol: &str) -> Result<Vec<PriceObservation>, ProviderError> {
        self.series
            .get(&symbol.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| ProviderError::Api {
                provider: self.id().to_string(),
                message: format!("No time series data for {}.", symbol),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[tokio::test]
    async fn test_static_history_sorted_and_case_insensitive() {
        let provider = StaticPriceHistory::new().with_series(
            "aapl",
            vec![
                PriceObservation::new(date(2024, 3), 3.0),
                PriceObservation::new(date(2024, 1), 1.0),
                PriceObservation::new(date(2024, 2), 2.0),
            ],
        );

        let history = provider.price_history(" AAPL").await.unwrap();
        let closes: Vec<f64> = history.iter().map(|o| o.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_monthly_closes_get_consecutive_dates() {
        let provider =
            StaticPriceHistory::new().with_monthly_closes("MSFT", date(2023, 11), &[10.0, 11.0, 12.0]);
        let history = provider.price_history("MSFT").await.unwrap();

        assert_eq!(history[0].timestamp, date(2023, 11));
        assert_eq!(history[2].timestamp, date(2024, 1));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_an_error() {
        let provider = StaticPriceHistory::new();
        let err = provider.price_history("NOPE").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
    }
}
