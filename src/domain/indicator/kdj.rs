//! KDJ stochastic oscillator.
//!
//! RSV = 100 * (close - LL) / (HH - LL) over rsv_period bars
//! K = SMA(RSV, k_smooth)
//! D = SMA(K, d_smooth)
//! J = SMA(3K - 2D, 3)
//!
//! K and D are the slow stochastic with simple-average smoothing; J amplifies
//! their divergence and can leave the 0-100 band. Warmups cascade through the
//! chained smoothing: K from (rsv_period - 1 + k_smooth - 1), D a further
//! (d_smooth - 1) bars, J a further 2 bars.

use crate::domain::indicator::{rolling_max, rolling_min, rolling_sma};
use crate::domain::ohlcv::PriceBar;

const J_SMOOTH: usize = 3;

#[derive(Debug, Clone)]
pub struct KdjSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub j: Vec<f64>,
}

pub fn calculate_kdj(
    bars: &[PriceBar],
    rsv_period: usize,
    k_smooth: usize,
    d_smooth: usize,
) -> KdjSeries {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highest = rolling_max(&highs, rsv_period);
    let lowest = rolling_min(&lows, rsv_period);

    let rsv: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = highest[i] - lowest[i];
            if range.is_nan() || range == 0.0 {
                f64::NAN
            } else {
                100.0 * (bar.close - lowest[i]) / range
            }
        })
        .collect();

    let k = rolling_sma(&rsv, k_smooth);
    let d = rolling_sma(&k, d_smooth);

    let j_raw: Vec<f64> = k
        .iter()
        .zip(&d)
        .map(|(k, d)| 3.0 * k - 2.0 * d)
        .collect();
    let j = rolling_sma(&j_raw, J_SMOOTH);

    KdjSeries { k, d, j }
}
