//! Projection inputs and their validation

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Longest horizon accepted by default (100 years)
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Capital side of a projection: everything except the growth rate.
///
/// This is what a caller supplies to a calculation session; the rate is
/// filled in once the instrument has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalInputs {
    /// Deposit at month 0 (currency units)
    pub initial_capital: f64,

    /// Contribution added every month, before growth
    pub monthly_contribution: f64,

    /// Number of simulated months
    pub horizon_months: u32,

    /// Annual inflation as a decimal fraction (0.05 = 5%)
    pub annual_inflation_rate: f64,
}

impl CapitalInputs {
    pub fn new(
        initial_capital: f64,
        monthly_contribution: f64,
        horizon_months: u32,
        annual_inflation_rate: f64,
    ) -> Self {
        Self {
            initial_capital,
            monthly_contribution,
            horizon_months,
            annual_inflation_rate,
        }
    }

    /// Combine with a resolved monthly rate
    pub fn with_rate(self, monthly_rate: f64) -> ProjectionInput {
        ProjectionInput {
            initial_capital: self.initial_capital,
            monthly_contribution: self.monthly_contribution,
            horizon_months: self.horizon_months,
            monthly_rate,
            annual_inflation_rate: self.annual_inflation_rate,
        }
    }
}

/// Full set of inputs for one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub initial_capital: f64,
    pub monthly_contribution: f64,
    pub horizon_months: u32,

    /// Monthly growth as a decimal fraction; negative for depreciating assets
    pub monthly_rate: f64,

    pub annual_inflation_rate: f64,
}

impl ProjectionInput {
    pub fn new(
        initial_capital: f64,
        monthly_contribution: f64,
        horizon_months: u32,
        monthly_rate: f64,
        annual_inflation_rate: f64,
    ) -> Self {
        Self {
            initial_capital,
            monthly_contribution,
            horizon_months,
            monthly_rate,
            annual_inflation_rate,
        }
    }

    /// Capital side of this input, without the rate
    pub fn capital(&self) -> CapitalInputs {
        CapitalInputs {
            initial_capital: self.initial_capital,
            monthly_contribution: self.monthly_contribution,
            horizon_months: self.horizon_months,
            annual_inflation_rate: self.annual_inflation_rate,
        }
    }

    /// Elapsed years over the horizon (fractional)
    pub fn horizon_years(&self) -> f64 {
        self.horizon_months as f64 / 12.0
    }

    /// Check every field against its allowed range.
    ///
    /// The first violation found is reported, in field declaration order.
    pub fn validate(&self, max_horizon_months: u32) -> Result<(), ProjectionError> {
        check_finite("initial_capital", self.initial_capital)?;
        if self.initial_capital < 0.0 {
            return Err(ProjectionError::invalid(
                "initial_capital",
                format!("must be non-negative, got {}", self.initial_capital),
            ));
        }

        check_finite("monthly_contribution", self.monthly_contribution)?;
        if self.monthly_contribution < 0.0 {
            return Err(ProjectionError::invalid(
                "monthly_contribution",
                format!("must be non-negative, got {}", self.monthly_contribution),
            ));
        }

        if self.horizon_months < 1 {
            return Err(ProjectionError::invalid(
                "horizon_months",
                "must be at least 1",
            ));
        }
        if self.horizon_months > max_horizon_months {
            return Err(ProjectionError::invalid(
                "horizon_months",
                format!(
                    "must not exceed {}, got {}",
                    max_horizon_months, self.horizon_months
                ),
            ));
        }

        check_finite("monthly_rate", self.monthly_rate)?;
        if self.monthly_rate <= -1.0 {
            return Err(ProjectionError::invalid(
                "monthly_rate",
                format!("must be greater than -1, got {}", self.monthly_rate),
            ));
        }

        check_finite("annual_inflation_rate", self.annual_inflation_rate)?;
        if self.annual_inflation_rate <= -1.0 {
            return Err(ProjectionError::invalid(
                "annual_inflation_rate",
                format!("must be greater than -1, got {}", self.annual_inflation_rate),
            ));
        }

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(field, "must be a finite number"))
    }
}
