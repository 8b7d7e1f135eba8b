#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use sweeptrader::domain::error::SweeptraderError;
use sweeptrader::domain::frame::{Field, IndicatorFrame};
use sweeptrader::domain::ohlcv::PriceBar;
use sweeptrader::domain::params::{KdjParams, MacdParams, ParamGrid, ParamSet};
use sweeptrader::domain::rule::{CmpOp, Condition, SignalRules};
use sweeptrader::domain::sweep::SummaryRow;
use sweeptrader::ports::data_port::DataPort;
use sweeptrader::ports::result_port::ResultSink;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
    }
}

pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close, 1000))
        .collect()
}

pub fn leaf(field: Field, op: CmpOp, threshold: f64) -> Condition {
    Condition::Leaf {
        field,
        op,
        threshold,
    }
}

/// Buy below / sell above a close threshold.
pub fn close_band_rules(buy_below: f64, sell_above: f64) -> SignalRules {
    SignalRules {
        buy: leaf(Field::Close, CmpOp::Lt, buy_below),
        sell: leaf(Field::Close, CmpOp::Gt, sell_above),
    }
}

pub fn small_param_set() -> ParamSet {
    ParamSet {
        ma: 2,
        rsi: 2,
        macd: MacdParams {
            fast: 2,
            slow: 3,
            signal: 2,
        },
        willr: 2,
        kdj: KdjParams { rsv: 2, k: 2, d: 2 },
    }
}

pub fn single_combo_grid() -> ParamGrid {
    let p = small_param_set();
    ParamGrid {
        ma_periods: vec![p.ma],
        rsi_periods: vec![p.rsi],
        macd_params: vec![p.macd],
        willr_periods: vec![p.willr],
        kdj_params: vec![p.kdj],
    }
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        _start_date: Option<NaiveDate>,
        _end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, SweeptraderError> {
        self.data
            .get(ticker)
            .cloned()
            .ok_or_else(|| SweeptraderError::Data {
                ticker: ticker.to_string(),
                reason: "no data".to_string(),
            })
    }

    fn list_tickers(&self) -> Result<Vec<String>, SweeptraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SweeptraderError> {
        Ok(self.data.get(ticker).and_then(|bars| {
            match (bars.first(), bars.last()) {
                (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
                _ => None,
            }
        }))
    }
}

/// In-memory sink recording every call, for sweep tests without a filesystem.
#[derive(Default)]
pub struct RecordingSink {
    pub prepared: Mutex<Vec<bool>>,
    pub frames: Mutex<Vec<(String, ParamSet, usize)>>,
    pub summaries: Mutex<Vec<(String, Vec<ParamSet>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl ResultSink for RecordingSink {
    fn prepare(&self, replace: bool) -> Result<(), SweeptraderError> {
        self.prepared.lock().unwrap().push(replace);
        Ok(())
    }

    fn write_frame(
        &self,
        ticker: &str,
        params: &ParamSet,
        frame: &IndicatorFrame,
    ) -> Result<(), SweeptraderError> {
        self.frames
            .lock()
            .unwrap()
            .push((ticker.to_string(), *params, frame.len()));
        Ok(())
    }

    fn write_summary(&self, ticker: &str, rows: &[SummaryRow]) -> Result<(), SweeptraderError> {
        self.summaries
            .lock()
            .unwrap()
            .push((ticker.to_string(), rows.iter().map(|r| r.params).collect()));
        Ok(())
    }
}

/// Sink whose frame writes always fail, for the isolation guarantee.
#[derive(Default)]
pub struct FailingFrameSink {
    pub summaries: Mutex<usize>,
}

impl ResultSink for FailingFrameSink {
    fn prepare(&self, _replace: bool) -> Result<(), SweeptraderError> {
        Ok(())
    }

    fn write_frame(
        &self,
        _ticker: &str,
        _params: &ParamSet,
        _frame: &IndicatorFrame,
    ) -> Result<(), SweeptraderError> {
        Err(SweeptraderError::Io(std::io::Error::other("disk full")))
    }

    fn write_summary(&self, _ticker: &str, _rows: &[SummaryRow]) -> Result<(), SweeptraderError> {
        *self.summaries.lock().unwrap() += 1;
        Ok(())
    }
}
