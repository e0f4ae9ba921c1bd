//! Average period-over-period growth from a series of closing prices

/// Why a growth rate could not be derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthShortfall {
    /// Fewer than two closes, so no period to measure
    TooFewPrices,
    /// Every period produced a non-finite growth value
    NoValidPeriods,
}

/// Arithmetic mean of `(close[i] - close[i-1]) / close[i-1]`.
///
/// `closes` must be in chronological order. Periods whose growth is not
/// finite (a zero or NaN close) are skipped rather than poisoning the mean.
pub fn average_period_growth(closes: &[f64]) -> Result<f64, GrowthShortfall> {
    if closes.len() < 2 {
        return Err(GrowthShortfall::TooFewPrices);
    }

    let mut sum = 0.0;
    let mut count = 0usize;

    for pair in closes.windows(2) {
        let growth = (pair[1] - pair[0]) / pair[0];
        if growth.is_finite() {
            sum += growth;
            count += 1;
        }
    }

    if count == 0 {
        return Err(GrowthShortfall::NoValidPeriods);
    }

    Ok(sum / count as f64)
}
