//! MACD (Moving Average Convergence Divergence).
//!
//! Line = EMA(fast) - EMA(slow)
//! Signal = EMA(signal_period) of the line
//! Histogram = Line - Signal
//!
//! Warmup: line from (slow - 1), signal and histogram from
//! (slow - 1 + signal_period - 1).

use crate::domain::indicator::seeded_ema;
use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_period == 0 {
        let nan = vec![f64::NAN; bars.len()];
        return MacdSeries {
            line: nan.clone(),
            signal: nan.clone(),
            histogram: nan,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = seeded_ema(&closes, fast);
    let ema_slow = seeded_ema(&closes, slow);

    // NaN arithmetic keeps the warmup prefix undefined without special cases.
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = seeded_ema(&line, signal_period);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
