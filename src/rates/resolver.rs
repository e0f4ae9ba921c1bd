//! Monthly rate resolution for fixed-income and equity instruments

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::fixed_income::FixedIncomeTable;
use super::growth::{average_period_growth, GrowthShortfall};
use super::instrument::InstrumentDescriptor;
use super::provider::PriceHistoryProvider;
use super::twelve_data::TwelveDataProvider;
use crate::config::ResolverConfig;
use crate::error::LoadError;

/// Outcome of a rate lookup.
///
/// `success == false` means `monthly_rate` is a fallback; `message` then
/// says why. A fallback resolution is still usable for projecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResolution {
    pub monthly_rate: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RateResolution {
    pub fn resolved(monthly_rate: f64) -> Self {
        Self {
            monthly_rate,
            success: true,
            message: None,
        }
    }

    pub fn fallback(monthly_rate: f64, message: impl Into<String>) -> Self {
        Self {
            monthly_rate,
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Resolves instruments to monthly growth rates.
///
/// Never fails: unknown products, thin price histories and provider errors
/// all degrade to the configured fallback rates.
pub struct RateResolver {
    config: ResolverConfig,
    fixed_income: FixedIncomeTable,
    prices: Arc<dyn PriceHistoryProvider>,
}

impl RateResolver {
    /// Create a resolver with an explicit table and price provider
    pub fn new(
        config: ResolverConfig,
        fixed_income: FixedIncomeTable,
        prices: Arc<dyn PriceHistoryProvider>,
    ) -> Self {
        Self {
            config,
            fixed_income,
            prices,
        }
    }

    /// Create a resolver backed by TwelveData.
    ///
    /// Loads `config.fixed_income_table` when set, otherwise uses the
    /// built-in table.
    pub fn from_config(config: ResolverConfig) -> Result<Self, LoadError> {
        let fixed_income = match &config.fixed_income_table {
            Some(path) => FixedIncomeTable::from_csv_path(path)?,
            None => FixedIncomeTable::default_rates(),
        };
        let prices = Arc::new(TwelveDataProvider::new(config.provider.clone())?);
        Ok(Self::new(config, fixed_income, prices))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn fixed_income_table(&self) -> &FixedIncomeTable {
        &self.fixed_income
    }

    /// Resolve a monthly rate, consulting the price provider for equities
    pub async fn resolve(&self, instrument: &InstrumentDescriptor) -> RateResolution {
        let resolution = match instrument {
            InstrumentDescriptor::FixedIncome { product_code } => self.fixed_income_rate(product_code),
            InstrumentDescriptor::Equity { symbol } => self.equity_rate(symbol).await,
        };
        log_resolution(instrument, &resolution);
        resolution
    }

    /// Resolve without any network access.
    ///
    /// Fixed income is looked up as usual; equities get the fallback rate.
    pub fn resolve_offline(&self, instrument: &InstrumentDescriptor) -> RateResolution {
        match instrument {
            InstrumentDescriptor::FixedIncome { product_code } => self.fixed_income_rate(product_code),
            InstrumentDescriptor::Equity { symbol } => RateResolution::fallback(
                self.config.equity_fallback_rate,
                format!("Price history not consulted for {}; using fallback rate.", symbol),
            ),
        }
    }

    fn fixed_income_rate(&self, product_code: &str) -> RateResolution {
        match self.fixed_income.get_rate(product_code) {
            Some(rate) => RateResolution::resolved(rate),
            None => RateResolution::fallback(
                self.config.fixed_income_default_rate,
                format!(
                    "Unknown fixed-income product {}; using default rate.",
                    product_code
                ),
            ),
        }
    }

    async fn equity_rate(&self, symbol: &str) -> RateResolution {
        let fallback = self.config.equity_fallback_rate;

        let history = match self.prices.price_history(symbol).await {
            Ok(history) => history,
            Err(e) => {
                return RateResolution::fallback(
                    fallback,
                    format!("Failed to fetch price history for {}: {}", symbol, e),
                )
            }
        };

        debug!(
            "{} returned {} observations for {}",
            self.prices.id(),
            history.len(),
            symbol
        );

        let closes: Vec<f64> = history.iter().map(|o| o.close).collect();
        match average_period_growth(&closes) {
            Ok(rate) => RateResolution::resolved(rate),
            Err(GrowthShortfall::TooFewPrices) => RateResolution::fallback(
                fallback,
                format!("No time series data for {}.", symbol),
            ),
            Err(GrowthShortfall::NoValidPeriods) => RateResolution::fallback(
                fallback,
                format!("Not enough valid data for {}.", symbol),
            ),
        }
    }
}

fn log_resolution(instrument: &InstrumentDescriptor, resolution: &RateResolution) {
    if resolution.success {
        debug!("Resolved {} to {:.6}/month", instrument, resolution.monthly_rate);
    } else {
        warn!(
            "Falling back to {:.6}/month for {}: {}",
            resolution.monthly_rate,
            instrument,
            resolution.message.as_deref().unwrap_or("no reason given")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_EQUITY_FALLBACK_RATE, DEFAULT_FIXED_INCOME_RATE};
    use crate::error::ProviderError;
    use crate::rates::provider::{PriceObservation, StaticPriceHistory};
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FailingProvider;

    #[async_trait]
    impl PriceHistoryProvider for FailingProvider {
        fn id(&self) -> &'static str {
            "FAILING"
        }

        async fn price_history(&self, _symbol: &str) -> Result<Vec<PriceObservation>, ProviderError> {
            Err(ProviderError::Timeout {
                provider: "FAILING".to_string(),
            })
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn resolver_with(prices: Arc<dyn PriceHistoryProvider>) -> RateResolver {
        RateResolver::new(ResolverConfig::default(), FixedIncomeTable::default_rates(), prices)
    }

    fn static_resolver() -> RateResolver {
        let prices = StaticPriceHistory::new()
            .with_monthly_closes("AAPL", start(), &[100.0, 102.0, 104.04])
            .with_monthly_closes("THIN", start(), &[100.0])
            .with_monthly_closes("ZERO", start(), &[0.0, 0.0, 0.0]);
        resolver_with(Arc::new(prices))
    }

    #[tokio::test]
    async fn test_fixed_income_lookup() {
        let resolution = static_resolver()
            .resolve(&InstrumentDescriptor::fixed_income("cdb"))
            .await;
        assert_eq!(resolution, RateResolution::resolved(0.008));
    }

    #[tokio::test]
    async fn test_unknown_fixed_income_falls_back() {
        let resolution = static_resolver()
            .resolve(&InstrumentDescriptor::fixed_income("debenture"))
            .await;
        assert!(!resolution.success);
        assert_eq!(resolution.monthly_rate, DEFAULT_FIXED_INCOME_RATE);
        assert!(resolution.message.unwrap().contains("debenture"));
    }

    #[tokio::test]
    async fn test_equity_average_growth() {
        let resolution = static_resolver()
            .resolve(&InstrumentDescriptor::equity("aapl"))
            .await;
        assert!(resolution.success);
        assert_relative_eq!(resolution.monthly_rate, 0.02, max_relative = 1e-9);
    }

    #[tokio::test]
    async fn test_equity_thin_history_falls_back() {
        let resolver = static_resolver();

        let thin = resolver.resolve(&InstrumentDescriptor::equity("THIN")).await;
        assert!(!thin.success);
        assert_eq!(thin.monthly_rate, DEFAULT_EQUITY_FALLBACK_RATE);

        let zero = resolver.resolve(&InstrumentDescriptor::equity("ZERO")).await;
        assert!(!zero.success);
        assert_eq!(zero.message.as_deref(), Some("Not enough valid data for ZERO."));
    }

    #[tokio::test]
    async fn test_provider_failure_is_absorbed() {
        let resolver = resolver_with(Arc::new(FailingProvider));
        let resolution = resolver.resolve(&InstrumentDescriptor::equity("AAPL")).await;

        assert!(!resolution.success);
        assert_eq!(resolution.monthly_rate, DEFAULT_EQUITY_FALLBACK_RATE);
        assert!(resolution.message.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_configured_fallbacks_are_used() {
        let config = ResolverConfig {
            equity_fallback_rate: 0.003,
            fixed_income_default_rate: 0.004,
            ..ResolverConfig::default()
        };
        let resolver = RateResolver::new(
            config,
            FixedIncomeTable::default_rates(),
            Arc::new(FailingProvider),
        );

        let equity = resolver.resolve(&InstrumentDescriptor::equity("X")).await;
        assert_eq!(equity.monthly_rate, 0.003);

        let fixed = resolver.resolve(&InstrumentDescriptor::fixed_income("x")).await;
        assert_eq!(fixed.monthly_rate, 0.004);
    }

    #[test]
    fn test_offline_resolution() {
        let resolver = static_resolver();

        let fixed = resolver.resolve_offline(&InstrumentDescriptor::fixed_income("lci"));
        assert_eq!(fixed, RateResolution::resolved(0.0075));

        let equity = resolver.resolve_offline(&InstrumentDescriptor::equity("AAPL"));
        assert!(!equity.success);
        assert_eq!(equity.monthly_rate, DEFAULT_EQUITY_FALLBACK_RATE);
    }

    #[test]
    fn test_from_config_loads_table_file() {
        let config = ResolverConfig {
            fixed_income_table: Some(crate::rates::DEFAULT_RATE_TABLE_PATH.into()),
            ..ResolverConfig::default()
        };
        let resolver = RateResolver::from_config(config).unwrap();
        assert_eq!(resolver.fixed_income_table().get_rate("cdb"), Some(0.008));

        let missing = ResolverConfig {
            fixed_income_table: Some("data/does_not_exist.csv".into()),
            ..ResolverConfig::default()
        };
        assert!(matches!(RateResolver::from_config(missing), Err(LoadError::Io(_))));
    }
}
