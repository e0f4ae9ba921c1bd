//! Simulation records exchanged with a history/persistence service
//!
//! The core only defines the record shape; storing, listing and deleting
//! records is left to whoever persists them.

mod loader;

pub use loader::{load_records, load_records_from_reader};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::projection::{CapitalInputs, ProjectionResult};
use crate::rates::{InstrumentDescriptor, InstrumentType};
use crate::session::Calculation;

/// Headline figures of a projection, stored alongside its inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub monthly_rate: f64,
    pub total_contributed: f64,
    pub gross_future_value: f64,
    pub gross_return: f64,
    pub inflation_adjusted_value: f64,
}

impl ResultSummary {
    pub fn from_result(monthly_rate: f64, result: &ProjectionResult) -> Self {
        Self {
            monthly_rate,
            total_contributed: result.total_contributed,
            gross_future_value: result.gross_future_value,
            gross_return: result.gross_return,
            inflation_adjusted_value: result.inflation_adjusted_value,
        }
    }
}

/// One past simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Assigned by the persistence service
    #[serde(default)]
    pub id: Option<String>,
    pub instrument_type: InstrumentType,
    pub instrument_name: String,
    pub initial_capital: f64,
    pub monthly_contribution: f64,
    pub horizon_months: u32,
    pub annual_inflation_rate: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Option<ResultSummary>,
}

impl SimulationRecord {
    /// Record a run before it has been projected
    pub fn new(
        instrument: &InstrumentDescriptor,
        capital: CapitalInputs,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            instrument_type: instrument.kind(),
            instrument_name: instrument.name().to_string(),
            initial_capital: capital.initial_capital,
            monthly_contribution: capital.monthly_contribution,
            horizon_months: capital.horizon_months,
            annual_inflation_rate: capital.annual_inflation_rate,
            created_at,
            summary: None,
        }
    }

    pub fn from_calculation(calculation: &Calculation, created_at: DateTime<Utc>) -> Self {
        Self {
            summary: Some(ResultSummary::from_result(
                calculation.rate.monthly_rate,
                &calculation.result,
            )),
            ..Self::new(&calculation.instrument, calculation.capital, created_at)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Instrument to re-resolve when re-simulating
    pub fn instrument(&self) -> InstrumentDescriptor {
        InstrumentDescriptor::from_parts(self.instrument_type, self.instrument_name.clone())
    }

    /// Capital inputs to re-project
    pub fn capital(&self) -> CapitalInputs {
        CapitalInputs::new(
            self.initial_capital,
            self.monthly_contribution,
            self.horizon_months,
            self.annual_inflation_rate,
        )
    }

    /// Display label such as "equity: AAPL"
    pub fn label(&self) -> String {
        format!("{}: {}", self.instrument_type, self.instrument_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionEngine;
    use crate::rates::RateResolution;
    use chrono::TimeZone;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    fn calculation() -> Calculation {
        let capital = CapitalInputs::new(1000.0, 100.0, 12, 0.05);
        let result = ProjectionEngine::default()
            .project(&capital.with_rate(0.008))
            .unwrap();
        Calculation {
            instrument: InstrumentDescriptor::fixed_income("cdb"),
            capital,
            rate: RateResolution::resolved(0.008),
            result,
        }
    }

    #[test]
    fn test_record_from_calculation() {
        let calc = calculation();
        let record = calc.to_record(created_at()).with_id("42");

        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.instrument_type, InstrumentType::FixedIncome);
        assert_eq!(record.instrument_name, "cdb");
        assert_eq!(record.horizon_months, 12);

        let summary = record.summary.unwrap();
        assert_eq!(summary.monthly_rate, 0.008);
        assert_eq!(summary.gross_future_value, calc.result.gross_future_value);
        assert_eq!(summary.total_contributed, 2200.0);
    }

    #[test]
    fn test_record_rebuilds_inputs() {
        let calc = calculation();
        let record = calc.to_record(created_at());

        assert_eq!(record.instrument(), calc.instrument);
        assert_eq!(record.capital(), calc.capital);
        assert_eq!(record.label(), "fixed-income: cdb");
    }

    #[test]
    fn test_record_json_shape() {
        let record = SimulationRecord::new(
            &InstrumentDescriptor::equity("AAPL"),
            CapitalInputs::new(500.0, 50.0, 24, 0.04),
            created_at(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["instrument_type"], "equity");
        assert_eq!(json["instrument_name"], "AAPL");
        assert_eq!(json["created_at"], "2025-03-14T12:00:00Z");
        assert!(json["summary"].is_null());

        let back: SimulationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
