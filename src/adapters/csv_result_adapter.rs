//! CSV result-sink adapter.
//!
//! Artifact naming contract (bit-exact, downstream lookup depends on it):
//! - qualifying frame: `{results_dir}/{ticker}_MA({ma})_RSI({rsi})_MACD({fast},{slow},{signal})_WILLR({willr})_KDJ({rsv},{k},{d}).csv`
//! - summary: `{data_dir}/{ticker}_strategy_results.csv`
//!
//! Undefined values render as empty cells, never as zero.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::SweeptraderError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::params::ParamSet;
use crate::domain::sweep::SummaryRow;
use crate::ports::result_port::ResultSink;

const FRAME_HEADER: [&str; 18] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "MA",
    "MACD",
    "MACD_Signal",
    "MACD_Hist",
    "RSI",
    "WILLR",
    "K",
    "D",
    "J",
    "Signal",
    "Profit",
    "Buy Date",
];

const SUMMARY_HEADER: [&str; 9] = [
    "MA",
    "RSI",
    "MACD",
    "WILLR",
    "KDJ",
    "Gross Profit",
    "Gross Loss",
    "Profit Factor",
    "Count",
];

pub struct CsvResultSink {
    data_dir: PathBuf,
    results_dir: PathBuf,
}

impl CsvResultSink {
    pub fn new(data_dir: PathBuf, results_dir: PathBuf) -> Self {
        Self {
            data_dir,
            results_dir,
        }
    }

    pub fn frame_path(&self, ticker: &str, params: &ParamSet) -> PathBuf {
        self.results_dir.join(format!("{}_{}.csv", ticker, params))
    }

    pub fn summary_path(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_strategy_results.csv", ticker))
    }
}

fn number_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

impl ResultSink for CsvResultSink {
    fn prepare(&self, replace: bool) -> Result<(), SweeptraderError> {
        if replace && self.results_dir.exists() {
            fs::remove_dir_all(&self.results_dir)?;
        }
        fs::create_dir_all(&self.results_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    fn write_frame(
        &self,
        ticker: &str,
        params: &ParamSet,
        frame: &IndicatorFrame,
    ) -> Result<(), SweeptraderError> {
        let mut wtr = csv::Writer::from_path(self.frame_path(ticker, params))
            .map_err(into_io_error)?;
        wtr.write_record(FRAME_HEADER).map_err(into_io_error)?;

        for row in &frame.rows {
            wtr.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.open.to_string(),
                row.high.to_string(),
                row.low.to_string(),
                row.close.to_string(),
                row.volume.to_string(),
                number_cell(row.ma),
                number_cell(row.macd),
                number_cell(row.macd_signal),
                number_cell(row.macd_hist),
                number_cell(row.rsi),
                number_cell(row.willr),
                number_cell(row.k),
                number_cell(row.d),
                number_cell(row.j),
                row.signal.to_string(),
                number_cell(row.profit),
                row.buy_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ])
            .map_err(into_io_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_summary(&self, ticker: &str, rows: &[SummaryRow]) -> Result<(), SweeptraderError> {
        let mut wtr =
            csv::Writer::from_path(self.summary_path(ticker)).map_err(into_io_error)?;
        wtr.write_record(SUMMARY_HEADER).map_err(into_io_error)?;

        for row in rows {
            let macd = row.params.macd;
            let kdj = row.params.kdj;
            wtr.write_record([
                row.params.ma.to_string(),
                row.params.rsi.to_string(),
                format!("({},{},{})", macd.fast, macd.slow, macd.signal),
                row.params.willr.to_string(),
                format!("({},{},{})", kdj.rsv, kdj.k, kdj.d),
                row.metrics.gross_profit.to_string(),
                row.metrics.gross_loss.to_string(),
                row.metrics
                    .profit_factor
                    .map(|pf| pf.to_string())
                    .unwrap_or_default(),
                row.metrics.trade_count.to_string(),
            ])
            .map_err(into_io_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn into_io_error(err: csv::Error) -> SweeptraderError {
    SweeptraderError::Io(std::io::Error::other(err))
}
