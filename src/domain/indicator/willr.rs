//! Williams %R.
//!
//! WILLR = -100 * (HH - close) / (HH - LL) over the trailing n bars, where HH
//! and LL are the highest high and lowest low of the window. Output range is
//! [-100, 0]. Warmup: first (n-1) bars are NaN. A degenerate window with
//! HH == LL yields NaN.

use crate::domain::indicator::{rolling_max, rolling_min};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_willr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highest = rolling_max(&highs, period);
    let lowest = rolling_min(&lows, period);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = highest[i] - lowest[i];
            if range.is_nan() || range == 0.0 {
                f64::NAN
            } else {
                -100.0 * (highest[i] - bar.close) / range
            }
        })
        .collect()
}
