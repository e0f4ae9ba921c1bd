//! Static monthly rates for fixed-income products

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::LoadError;

/// Default path to the fixed-income rate table
pub const DEFAULT_RATE_TABLE_PATH: &str = "data/fixed_income_rates.csv";

/// Monthly rates keyed by product code.
///
/// Codes are normalised (trimmed, lower-cased) on insert and lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedIncomeTable {
    rates: HashMap<String, f64>,
}

impl FixedIncomeTable {
    /// Create the built-in table of canonical monthly rates
    pub fn default_rates() -> Self {
        let mut rates = HashMap::new();
        rates.insert("cdb".to_string(), 0.008);
        rates.insert("tesouro-direto".to_string(), 0.007);
        rates.insert("lci".to_string(), 0.0075);
        rates.insert("lca".to_string(), 0.0075);
        rates.insert("poupanca".to_string(), 0.005);
        Self { rates }
    }

    /// Create from (code, monthly rate) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let rates = pairs
            .into_iter()
            .map(|(code, rate)| (normalize(code.as_ref()), rate))
            .collect();
        Self { rates }
    }

    /// Load from a CSV with `product_code,monthly_rate` columns
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load from any CSV reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rates = HashMap::new();

        for result in csv_reader.records() {
            let record = result?;
            if record.len() < 2 {
                return Err(LoadError::Invalid(format!(
                    "expected product_code,monthly_rate but got {} columns",
                    record.len()
                )));
            }
            let code = normalize(&record[0]);
            let rate: f64 = record[1].trim().parse().map_err(|_| {
                LoadError::Invalid(format!("bad monthly rate for {}: {}", code, &record[1]))
            })?;
            if !rate.is_finite() || rate <= -1.0 {
                return Err(LoadError::Invalid(format!(
                    "monthly rate for {} out of range: {}",
                    code, rate
                )));
            }
            rates.insert(code, rate);
        }

        Ok(Self { rates })
    }

    /// Monthly rate for a product code, if known
    pub fn get_rate(&self, product_code: &str) -> Option<f64> {
        self.rates.get(&normalize(product_code)).copied()
    }

    pub fn contains(&self, product_code: &str) -> bool {
        self.get_rate(product_code).is_some()
    }

    /// Known product codes, sorted
    pub fn product_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for FixedIncomeTable {
    fn default() -> Self {
        Self::default_rates()
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}
