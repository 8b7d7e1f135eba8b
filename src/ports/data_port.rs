//! Price history provider port.

use chrono::NaiveDate;

use crate::domain::error::SweeptraderError;
use crate::domain::ohlcv::PriceBar;

pub trait DataPort {
    /// Ordered bars for a ticker over a date range. Calendar gaps are simply
    /// absent rows.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, SweeptraderError>;

    /// Tickers with price history available.
    fn list_tickers(&self) -> Result<Vec<String>, SweeptraderError>;

    /// First date, last date and bar count for a ticker, or `None` if it has
    /// no data.
    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SweeptraderError>;
}
