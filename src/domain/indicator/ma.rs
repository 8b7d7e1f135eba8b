//! Simple moving average of closing prices.
//!
//! Warmup: first (n-1) bars are NaN.

use crate::domain::indicator::rolling_sma;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ma(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    rolling_sma(&closes, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ma_warmup_is_nan() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let ma = calculate_ma(&bars, 3);

        assert!(ma[0].is_nan());
        assert!(ma[1].is_nan());
        assert_relative_eq!(ma[2], 20.0);
        assert_relative_eq!(ma[3], 30.0);
    }

    #[test]
    fn ma_period_longer_than_series_all_nan() {
        let bars = make_bars(&[10.0, 12.0, 8.0]);
        let ma = calculate_ma(&bars, 5);

        assert_eq!(ma.len(), 3);
        assert!(ma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ma_flat_series_equals_close() {
        let bars = make_bars(&[100.0; 6]);
        let ma = calculate_ma(&bars, 3);

        for value in &ma[2..] {
            assert_relative_eq!(*value, 100.0);
        }
    }

    #[test]
    fn ma_period_1_equals_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let ma = calculate_ma(&bars, 1);

        assert_relative_eq!(ma[0], 10.0);
        assert_relative_eq!(ma[1], 20.0);
        assert_relative_eq!(ma[2], 30.0);
    }

    #[test]
    fn ma_same_length_as_input() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(calculate_ma(&bars, 2).len(), bars.len());
        assert_eq!(calculate_ma(&bars, 0).len(), bars.len());
    }
}
