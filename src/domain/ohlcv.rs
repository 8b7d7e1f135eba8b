//! Daily OHLCV bar representation.

use chrono::NaiveDate;

use crate::domain::error::SweeptraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Validate a price series before any combination runs.
///
/// The series must be non-empty with strictly increasing dates (no duplicate
/// days). Gaps are fine; missing dates are simply absent rows.
pub fn validate_series(ticker: &str, bars: &[PriceBar]) -> Result<(), SweeptraderError> {
    if bars.is_empty() {
        return Err(SweeptraderError::Data {
            ticker: ticker.to_string(),
            reason: "price series is empty".to_string(),
        });
    }

    for window in bars.windows(2) {
        if window[1].date <= window[0].date {
            return Err(SweeptraderError::Data {
                ticker: ticker.to_string(),
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    window[0].date, window[1].date
                ),
            });
        }
    }

    Ok(())
}
