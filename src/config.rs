//! Rate resolution configuration
//!
//! Everything the resolver needs is carried in these structs and handed to it
//! at construction. Every field has a serde default, so a JSON file only needs
//! to name what it overrides.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Monthly rate used for fixed-income codes missing from the table
pub const DEFAULT_FIXED_INCOME_RATE: f64 = 0.005;

/// Monthly rate used when an equity growth rate cannot be derived
pub const DEFAULT_EQUITY_FALLBACK_RATE: f64 = 0.01;

/// Settings for the HTTP price-history provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; requests are not attempted without one
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling interval requested from the provider
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Number of observations requested
    #[serde(default = "default_output_size")]
    pub output_size: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { "https://api.twelvedata.com".to_string() }
fn default_interval() -> String { "1month".to_string() }
fn default_output_size() -> u32 { 24 }
fn default_timeout_secs() -> u64 { 30 }
fn default_fixed_income_rate() -> f64 { DEFAULT_FIXED_INCOME_RATE }
fn default_equity_fallback_rate() -> f64 { DEFAULT_EQUITY_FALLBACK_RATE }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            interval: default_interval(),
            output_size: default_output_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for [`crate::rates::RateResolver`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default = "default_fixed_income_rate")]
    pub fixed_income_default_rate: f64,

    #[serde(default = "default_equity_fallback_rate")]
    pub equity_fallback_rate: f64,

    /// Optional CSV overriding the built-in fixed-income table
    #[serde(default)]
    pub fixed_income_table: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            fixed_income_default_rate: DEFAULT_FIXED_INCOME_RATE,
            equity_fallback_rate: DEFAULT_EQUITY_FALLBACK_RATE,
            fixed_income_table: None,
        }
    }
}

impl ResolverConfig {
    /// Load a config from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.check()?;
        Ok(config)
    }

    /// Parse a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Replace the API key, e.g. from a command-line flag
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if api_key.is_some() {
            self.provider.api_key = api_key;
        }
        self
    }

    fn check(&self) -> Result<(), LoadError> {
        for (name, rate) in [
            ("fixed_income_default_rate", self.fixed_income_default_rate),
            ("equity_fallback_rate", self.equity_fallback_rate),
        ] {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(LoadError::Invalid(format!(
                    "{} must be a finite rate greater than -1, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}
