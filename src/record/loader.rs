//! Load simulation records from CSV

use std::path::Path;

use chrono::{DateTime, Utc};
use csv::Reader;

use super::SimulationRecord;
use crate::error::LoadError;
use crate::rates::InstrumentType;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    instrument_type: String,
    instrument_name: String,
    initial_capital: f64,
    monthly_contribution: f64,
    horizon_months: u32,
    annual_inflation_rate: f64,
    created_at: DateTime<Utc>,
}

impl CsvRow {
    fn into_record(self) -> Result<SimulationRecord, LoadError> {
        let instrument_type: InstrumentType = self.instrument_type.parse().map_err(LoadError::Invalid)?;

        if self.instrument_name.trim().is_empty() {
            return Err(LoadError::Invalid("Empty instrument_name".to_string()));
        }

        Ok(SimulationRecord {
            id: self.id.filter(|id| !id.trim().is_empty()),
            instrument_type,
            instrument_name: self.instrument_name.trim().to_string(),
            initial_capital: self.initial_capital,
            monthly_contribution: self.monthly_contribution,
            horizon_months: self.horizon_months,
            annual_inflation_rate: self.annual_inflation_rate,
            created_at: self.created_at,
            summary: None,
        })
    }
}

/// Load all records from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<SimulationRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_records_from_reader(file)
}

/// Load records from any reader (e.g., string buffer, network stream)
pub fn load_records_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<SimulationRecord>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }

    Ok(records)
}
