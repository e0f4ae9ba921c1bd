//! Core projection engine for monthly accumulation projections

use log::debug;

use super::input::{ProjectionInput, MAX_HORIZON_MONTHS};
use super::trajectory::{round_to_cents, ProjectionPoint, ProjectionResult};
use crate::error::ProjectionError;

/// Configuration for the projection engine
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Longest horizon accepted, in months; capped at [`MAX_HORIZON_MONTHS`]
    pub max_horizon_months: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_horizon_months: MAX_HORIZON_MONTHS,
        }
    }
}

/// Main projection engine.
///
/// Stateless apart from its configuration: every call to [`project`](Self::project)
/// builds a fresh result, so one engine can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run a projection.
    ///
    /// Each month the contribution is added first and growth is applied to the
    /// resulting balance, including month 1. Trajectory points after month 0
    /// are rounded to cents; the running balance is not.
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        input.validate(self.config.max_horizon_months.min(MAX_HORIZON_MONTHS))?;

        let growth_factor = 1.0 + input.monthly_rate;
        let mut accumulated = input.initial_capital;
        let mut total_contributed = input.initial_capital;

        let mut trajectory = Vec::with_capacity(input.horizon_months as usize + 1);
        trajectory.push(ProjectionPoint::new(0, accumulated));

        for month in 1..=input.horizon_months {
            accumulated += input.monthly_contribution;
            total_contributed += input.monthly_contribution;

            accumulated *= growth_factor;

            trajectory.push(ProjectionPoint::new(month, round_to_cents(accumulated)));
        }

        let gross_future_value = accumulated;
        let gross_return = gross_future_value - total_contributed;
        let inflation_adjusted_value =
            deflate(gross_future_value, input.annual_inflation_rate, input.horizon_years());

        debug!(
            "Projected {} months at {:.6}/month: gross {:.2}, contributed {:.2}",
            input.horizon_months, input.monthly_rate, gross_future_value, total_contributed
        );

        Ok(ProjectionResult {
            trajectory,
            total_contributed,
            gross_future_value,
            gross_return,
            inflation_adjusted_value,
        })
    }
}

/// Discount a nominal value by compounded annual inflation over `years`
pub fn deflate(nominal: f64, annual_inflation_rate: f64, years: f64) -> f64 {
    nominal / (1.0 + annual_inflation_rate).powf(years)
}
