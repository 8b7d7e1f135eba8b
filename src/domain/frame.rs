//! Indicator-annotated bar frame.
//!
//! One `FrameRow` per input bar, holding the raw OHLCV fields plus every
//! indicator column for a single parameter combination. Undefined indicator
//! values are `f64::NAN`; rule evaluation reads rows through the closed
//! [`Field`] enum so there are no string lookups in the hot path.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::indicator::kdj::calculate_kdj;
use crate::domain::indicator::ma::calculate_ma;
use crate::domain::indicator::macd::calculate_macd;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::willr::calculate_willr;
use crate::domain::ohlcv::PriceBar;
use crate::domain::params::ParamSet;

/// Every column a rule leaf may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
    Ma,
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    Willr,
    K,
    D,
    J,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
        Field::Ma,
        Field::Rsi,
        Field::Macd,
        Field::MacdSignal,
        Field::MacdHist,
        Field::Willr,
        Field::K,
        Field::D,
        Field::J,
    ];

    /// Canonical column name, shared by the rule document and the CSV
    /// artifacts.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
            Field::Ma => "MA",
            Field::Rsi => "RSI",
            Field::Macd => "MACD",
            Field::MacdSignal => "MACD_Signal",
            Field::MacdHist => "MACD_Hist",
            Field::Willr => "WILLR",
            Field::K => "K",
            Field::D => "D",
            Field::J => "J",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One indicator-annotated bar.
///
/// `signal`, `profit` and `buy_date` are written by the position tracker:
/// +1/-1/0 for the observable signal column, the realized profit on a sell
/// bar (NaN otherwise), and the matching entry date.
#[derive(Debug, Clone)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub ma: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub willr: f64,
    pub k: f64,
    pub d: f64,
    pub j: f64,
    pub signal: i8,
    pub profit: f64,
    pub buy_date: Option<NaiveDate>,
}

impl FrameRow {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume as f64,
            Field::Ma => self.ma,
            Field::Rsi => self.rsi,
            Field::Macd => self.macd,
            Field::MacdSignal => self.macd_signal,
            Field::MacdHist => self.macd_hist,
            Field::Willr => self.willr,
            Field::K => self.k,
            Field::D => self.d,
            Field::J => self.j,
        }
    }
}

/// A price series annotated with indicators for one parameter combination.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    /// Compute all indicator columns for `params` over `bars`.
    ///
    /// Output is aligned index-for-index with the input; insufficient history
    /// shows up as NaN columns, not as an error.
    pub fn compute(bars: &[PriceBar], params: &ParamSet) -> IndicatorFrame {
        let ma = calculate_ma(bars, params.ma);
        let rsi = calculate_rsi(bars, params.rsi);
        let macd = calculate_macd(bars, params.macd.fast, params.macd.slow, params.macd.signal);
        let willr = calculate_willr(bars, params.willr);
        let kdj = calculate_kdj(bars, params.kdj.rsv, params.kdj.k, params.kdj.d);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| FrameRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                ma: ma[i],
                rsi: rsi[i],
                macd: macd.line[i],
                macd_signal: macd.signal[i],
                macd_hist: macd.histogram[i],
                willr: willr[i],
                k: kdj.k[i],
                d: kdj.d[i],
                j: kdj.j[i],
                signal: 0,
                profit: f64::NAN,
                buy_date: None,
            })
            .collect();

        IndicatorFrame { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
