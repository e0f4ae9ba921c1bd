//! Instrument descriptors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Instrument class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstrumentType {
    FixedIncome,
    Equity,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedIncome => "fixed-income",
            Self::Equity => "equity",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed-income" | "fixed_income" | "fixedincome" => Ok(Self::FixedIncome),
            "equity" | "stock" => Ok(Self::Equity),
            other => Err(format!("Unknown instrument type: {}", other)),
        }
    }
}

/// What to resolve a monthly rate for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InstrumentDescriptor {
    /// Product looked up in the static fixed-income table (e.g. "cdb")
    FixedIncome { product_code: String },
    /// Ticker whose growth is derived from historical closes (e.g. "AAPL")
    Equity { symbol: String },
}

impl InstrumentDescriptor {
    pub fn fixed_income(product_code: impl Into<String>) -> Self {
        Self::FixedIncome {
            product_code: product_code.into(),
        }
    }

    pub fn equity(symbol: impl Into<String>) -> Self {
        Self::Equity {
            symbol: symbol.into(),
        }
    }

    /// Build from a type and a name, as stored in simulation records
    pub fn from_parts(kind: InstrumentType, name: impl Into<String>) -> Self {
        match kind {
            InstrumentType::FixedIncome => Self::fixed_income(name),
            InstrumentType::Equity => Self::equity(name),
        }
    }

    pub fn kind(&self) -> InstrumentType {
        match self {
            Self::FixedIncome { .. } => InstrumentType::FixedIncome,
            Self::Equity { .. } => InstrumentType::Equity,
        }
    }

    /// Product code or ticker
    pub fn name(&self) -> &str {
        match self {
            Self::FixedIncome { product_code } => product_code,
            Self::Equity { symbol } => symbol,
        }
    }
}

impl fmt::Display for InstrumentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.name())
    }
}
