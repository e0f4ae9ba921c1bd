//! Scenario runner for what-if analysis, record comparison and batch projections
//!
//! Holds one engine and reuses it for every projection. Batch runs fan out
//! across threads with rayon; comparisons and batches use offline rates so
//! no network access happens here.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::projection::{ProjectionEngine, ProjectionInput, ProjectionResult};
use crate::rates::{RateResolution, RateResolver};
use crate::record::SimulationRecord;

/// Fewest records that make a comparison
pub const MIN_COMPARED_RECORDS: usize = 2;

/// Most records that can be compared side by side
pub const MAX_COMPARED_RECORDS: usize = 3;

/// Changes applied to a base scenario
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    /// Percentage change to initial capital (10.0 = +10%)
    pub initial_capital_pct: f64,
    /// Percentage change to the monthly contribution
    pub monthly_contribution_pct: f64,
    /// Months added to (or removed from) the horizon
    pub horizon_delta_months: i32,
}

impl ScenarioAdjustment {
    /// Apply to a base input. The rate and inflation are left untouched.
    pub fn apply(&self, base: &ProjectionInput) -> Result<ProjectionInput, ProjectionError> {
        let horizon = i64::from(base.horizon_months) + i64::from(self.horizon_delta_months);
        if horizon < 1 {
            return Err(ProjectionError::invalid(
                "horizon_months",
                format!("adjusted horizon must be at least 1, got {}", horizon),
            ));
        }
        let horizon_months = u32::try_from(horizon).map_err(|_| {
            ProjectionError::invalid("horizon_months", format!("adjusted horizon too large: {}", horizon))
        })?;

        Ok(ProjectionInput {
            initial_capital: base.initial_capital * (1.0 + self.initial_capital_pct / 100.0),
            monthly_contribution: base.monthly_contribution * (1.0 + self.monthly_contribution_pct / 100.0),
            horizon_months,
            ..*base
        })
    }
}

/// Difference of one metric between base and adjusted scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub absolute: f64,
    /// Relative change in percent; None when the base is zero
    pub percent: Option<f64>,
}

impl MetricDelta {
    pub fn between(base: f64, adjusted: f64) -> Self {
        let absolute = adjusted - base;
        let percent = if base == 0.0 {
            None
        } else {
            Some(absolute / base * 100.0)
        };
        Self { absolute, percent }
    }

    pub fn is_positive(&self) -> bool {
        self.absolute > 0.0
    }
}

/// Base and adjusted projections with their differences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    pub base: ProjectionResult,
    pub adjusted_input: ProjectionInput,
    pub adjusted: ProjectionResult,
    pub gross_future_value: MetricDelta,
    pub total_contributed: MetricDelta,
    pub gross_return: MetricDelta,
    pub inflation_adjusted_value: MetricDelta,
}

/// A stored record projected with an offline rate
#[derive(Debug, Clone, PartialEq)]
pub struct RecordProjection {
    pub record: SimulationRecord,
    pub rate: RateResolution,
    pub result: ProjectionResult,
}

/// Runs many projections with one engine
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Run a single projection
    pub fn run(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        self.engine.project(input)
    }

    /// Run many projections in parallel; results keep input order
    pub fn run_batch(&self, inputs: &[ProjectionInput]) -> Vec<Result<ProjectionResult, ProjectionError>> {
        inputs.par_iter().map(|input| self.engine.project(input)).collect()
    }

    /// Project a base scenario and an adjusted copy of it
    pub fn what_if(
        &self,
        base: &ProjectionInput,
        adjustment: &ScenarioAdjustment,
    ) -> Result<WhatIfOutcome, ProjectionError> {
        let base_result = self.engine.project(base)?;
        let adjusted_input = adjustment.apply(base)?;
        let adjusted = self.engine.project(&adjusted_input)?;

        Ok(WhatIfOutcome {
            gross_future_value: MetricDelta::between(base_result.gross_future_value, adjusted.gross_future_value),
            total_contributed: MetricDelta::between(base_result.total_contributed, adjusted.total_contributed),
            gross_return: MetricDelta::between(base_result.gross_return, adjusted.gross_return),
            inflation_adjusted_value: MetricDelta::between(
                base_result.inflation_adjusted_value,
                adjusted.inflation_adjusted_value,
            ),
            base: base_result,
            adjusted_input,
            adjusted,
        })
    }

    /// Project [`MIN_COMPARED_RECORDS`] to [`MAX_COMPARED_RECORDS`] records side by side
    pub fn compare(
        &self,
        records: &[SimulationRecord],
        resolver: &RateResolver,
    ) -> Result<Vec<RecordProjection>, ProjectionError> {
        if !(MIN_COMPARED_RECORDS..=MAX_COMPARED_RECORDS).contains(&records.len()) {
            return Err(ProjectionError::invalid(
                "records",
                format!(
                    "between {} and {} records can be compared, got {}",
                    MIN_COMPARED_RECORDS,
                    MAX_COMPARED_RECORDS,
                    records.len()
                ),
            ));
        }

        records
            .iter()
            .map(|record| self.project_record(record, resolver))
            .collect()
    }

    /// Project every record in parallel; results keep input order
    pub fn run_records(
        &self,
        records: &[SimulationRecord],
        resolver: &RateResolver,
    ) -> Vec<Result<RecordProjection, ProjectionError>> {
        records
            .par_iter()
            .map(|record| self.project_record(record, resolver))
            .collect()
    }

    fn project_record(
        &self,
        record: &SimulationRecord,
        resolver: &RateResolver,
    ) -> Result<RecordProjection, ProjectionError> {
        let rate = resolver.resolve_offline(&record.instrument());
        let result = self
            .engine
            .project(&record.capital().with_rate(rate.monthly_rate))?;

        Ok(RecordProjection {
            record: record.clone(),
            rate,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::projection::CapitalInputs;
    use crate::rates::{FixedIncomeTable, InstrumentDescriptor, StaticPriceHistory};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn base_input() -> ProjectionInput {
        ProjectionInput::new(1000.0, 100.0, 12, 0.01, 0.05)
    }

    fn resolver() -> RateResolver {
        RateResolver::new(
            ResolverConfig::default(),
            FixedIncomeTable::default_rates(),
            Arc::new(StaticPriceHistory::new()),
        )
    }

    fn record(kind: &str, name: &str) -> SimulationRecord {
        let instrument = match kind {
            "equity" => InstrumentDescriptor::equity(name),
            _ => InstrumentDescriptor::fixed_income(name),
        };
        SimulationRecord::new(
            &instrument,
            CapitalInputs::new(1000.0, 100.0, 24, 0.05),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_adjustment_apply() {
        let adjustment = ScenarioAdjustment {
            initial_capital_pct: 10.0,
            monthly_contribution_pct: -50.0,
            horizon_delta_months: 6,
        };
        let adjusted = adjustment.apply(&base_input()).unwrap();

        assert_relative_eq!(adjusted.initial_capital, 1100.0, max_relative = 1e-12);
        assert_relative_eq!(adjusted.monthly_contribution, 50.0, max_relative = 1e-12);
        assert_eq!(adjusted.horizon_months, 18);
        assert_eq!(adjusted.monthly_rate, 0.01);
        assert_eq!(adjusted.annual_inflation_rate, 0.05);
    }

    #[test]
    fn test_adjustment_cannot_empty_horizon() {
        let adjustment = ScenarioAdjustment {
            horizon_delta_months: -12,
            ..Default::default()
        };
        let err = adjustment.apply(&base_input()).unwrap_err();
        assert_eq!(err.field(), "horizon_months");
    }

    #[test]
    fn test_what_if_initial_capital_only() {
        let runner = ScenarioRunner::new();
        let outcome = runner
            .what_if(
                &base_input(),
                &ScenarioAdjustment {
                    initial_capital_pct: 10.0,
                    ..Default::default()
                },
            )
            .unwrap();

        // Only the extra 100 of initial capital compounds differently
        assert_relative_eq!(
            outcome.gross_future_value.absolute,
            100.0 * 1.01_f64.powi(12),
            max_relative = 1e-9
        );
        assert_relative_eq!(outcome.total_contributed.absolute, 100.0, max_relative = 1e-12);
        assert_relative_eq!(outcome.total_contributed.percent.unwrap(), 100.0 / 2200.0 * 100.0, max_relative = 1e-12);
        assert!(outcome.gross_return.is_positive());
    }

    #[test]
    fn test_neutral_adjustment_has_no_delta() {
        let runner = ScenarioRunner::new();
        let outcome = runner.what_if(&base_input(), &ScenarioAdjustment::default()).unwrap();

        assert_eq!(outcome.base, outcome.adjusted);
        assert_eq!(outcome.gross_future_value.absolute, 0.0);
        assert_eq!(outcome.gross_future_value.percent, Some(0.0));
    }

    #[test]
    fn test_metric_delta_zero_base() {
        let delta = MetricDelta::between(0.0, 50.0);
        assert_eq!(delta.absolute, 50.0);
        assert_eq!(delta.percent, None);
    }

    #[test]
    fn test_run_batch_keeps_order() {
        let runner = ScenarioRunner::new();
        let inputs: Vec<_> = [0.005, 0.01, 0.0, 0.02]
            .iter()
            .map(|&rate| ProjectionInput { monthly_rate: rate, ..base_input() })
            .chain(std::iter::once(ProjectionInput { horizon_months: 0, ..base_input() }))
            .collect();

        let results = runner.run_batch(&inputs);
        assert_eq!(results.len(), 5);
        for (input, result) in inputs.iter().zip(&results).take(4) {
            assert_eq!(result.as_ref().unwrap(), &runner.run(input).unwrap());
        }
        assert!(results[4].is_err());

        // Higher rate should result in higher final value
        let gross: Vec<f64> = results[..4].iter().map(|r| r.as_ref().unwrap().gross_future_value).collect();
        assert!(gross[3] > gross[1] && gross[1] > gross[0] && gross[0] > gross[2]);
    }

    #[test]
    fn test_compare_records() {
        let runner = ScenarioRunner::new();
        let records = vec![record("fixed-income", "cdb"), record("equity", "AAPL")];
        let compared = runner.compare(&records, &resolver()).unwrap();

        assert_eq!(compared.len(), 2);
        assert_eq!(compared[0].rate, RateResolution::resolved(0.008));
        assert!(!compared[1].rate.success);
        assert_eq!(compared[1].rate.monthly_rate, 0.01);
        assert!(compared[1].result.gross_future_value > compared[0].result.gross_future_value);
    }

    #[test]
    fn test_compare_rejects_too_many() {
        let runner = ScenarioRunner::new();
        let records: Vec<_> = ["cdb", "lci", "lca", "poupanca"]
            .iter()
            .map(|code| record("fixed-income", code))
            .collect();

        let err = runner.compare(&records, &resolver()).unwrap_err();
        assert_eq!(err.field(), "records");
    }

    #[test]
    fn test_compare_needs_two_records() {
        let runner = ScenarioRunner::new();
        assert_eq!(runner.compare(&[], &resolver()).unwrap_err().field(), "records");

        let single = vec![record("fixed-income", "cdb")];
        assert_eq!(runner.compare(&single, &resolver()).unwrap_err().field(), "records");
    }

    #[test]
    fn test_run_records_has_no_limit() {
        let runner = ScenarioRunner::new();
        let records: Vec<_> = ["cdb", "lci", "lca", "poupanca", "tesouro-direto"]
            .iter()
            .map(|code| record("fixed-income", code))
            .collect();

        let results = runner.run_records(&records, &resolver());
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.as_ref().unwrap().rate.success));
        assert_eq!(results[4].as_ref().unwrap().record.instrument_name, "tesouro-direto");
    }
}
