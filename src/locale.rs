//! Parsing of pt-BR formatted amounts ("1.234,56")
//!
//! Form fields arrive with `.` as thousands separator and `,` as decimal
//! separator. Conversion happens here, before values reach the engine.

use crate::error::ProjectionError;

/// Parse a currency amount such as `"1.000,50"` or `"R$ 250"`.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<f64, ProjectionError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(ProjectionError::invalid(field, "value is empty"));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| ProjectionError::invalid(field, format!("not a number: {:?}", raw)))?;

    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, format!("not a number: {:?}", raw)));
    }

    Ok(value)
}

/// Parse a percentage such as `"5,0"` or `"4,5%"` into a decimal fraction
pub fn parse_percent(field: &'static str, raw: &str) -> Result<f64, ProjectionError> {
    let without_sign = raw.trim().trim_end_matches('%');
    parse_amount(field, without_sign).map(|pct| pct / 100.0)
}
