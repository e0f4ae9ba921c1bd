//! Output structures for projections

use serde::{Deserialize, Serialize};

/// Balance at the end of one simulated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 0 is the starting deposit, before any contribution or growth
    pub month_index: u32,

    /// Accumulated value, rounded to cents for every month after 0
    pub accumulated_value: f64,
}

impl ProjectionPoint {
    pub fn new(month_index: u32, accumulated_value: f64) -> Self {
        Self {
            month_index,
            accumulated_value,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Month-by-month balances, `horizon_months + 1` entries
    pub trajectory: Vec<ProjectionPoint>,

    /// Initial deposit plus every monthly contribution applied
    pub total_contributed: f64,

    /// Final balance (unrounded)
    pub gross_future_value: f64,

    /// Gross future value minus total contributed
    pub gross_return: f64,

    /// Gross future value in month-0 purchasing power
    pub inflation_adjusted_value: f64,
}

impl ProjectionResult {
    /// Number of simulated months
    pub fn horizon_months(&self) -> u32 {
        self.trajectory.last().map(|p| p.month_index).unwrap_or(0)
    }

    /// Last point of the trajectory
    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.trajectory.last()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let inflation_loss = self.gross_future_value - self.inflation_adjusted_value;
        let real_return = self.inflation_adjusted_value - self.total_contributed;

        ProjectionSummary {
            total_months: self.horizon_months(),
            total_contributed: self.total_contributed,
            gross_future_value: self.gross_future_value,
            gross_return: self.gross_return,
            inflation_adjusted_value: self.inflation_adjusted_value,
            inflation_loss,
            real_return,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_contributed: f64,
    pub gross_future_value: f64,
    pub gross_return: f64,
    pub inflation_adjusted_value: f64,
    /// Purchasing power lost to inflation over the horizon
    pub inflation_loss: f64,
    /// Inflation-adjusted value minus total contributed
    pub real_return: f64,
}

/// Round a currency amount to cents
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
