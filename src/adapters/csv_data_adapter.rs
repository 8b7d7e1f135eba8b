//! CSV price-data adapter.
//!
//! Reads `{data_dir}/{ticker}_raw_data.csv` with the header
//! `Date,Open,High,Low,Close,Volume` and `%Y-%m-%d` dates. Tickers are
//! discovered from the same suffix.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::SweeptraderError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;

const RAW_DATA_SUFFIX: &str = "_raw_data.csv";

pub struct CsvDataAdapter {
    data_dir: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", ticker, RAW_DATA_SUFFIX))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<PriceBar>, SweeptraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SweeptraderError::Data {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(ticker, &format!("CSV parse error: {}", e)))?;

            let date_str = field(ticker, &record, 0, "Date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| data_error(ticker, &format!("invalid date '{}': {}", date_str, e)))?;

            bars.push(PriceBar {
                date,
                open: parse_number(ticker, &record, 1, "Open")?,
                high: parse_number(ticker, &record, 2, "High")?,
                low: parse_number(ticker, &record, 3, "Low")?,
                close: parse_number(ticker, &record, 4, "Close")?,
                volume: field(ticker, &record, 5, "Volume")?
                    .parse()
                    .map_err(|e| data_error(ticker, &format!("invalid Volume value: {}", e)))?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    ticker: &str,
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, SweeptraderError> {
    record
        .get(index)
        .ok_or_else(|| data_error(ticker, &format!("missing {} column", name)))
}

fn parse_number(
    ticker: &str,
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, SweeptraderError> {
    field(ticker, record, index, name)?
        .parse()
        .map_err(|e| data_error(ticker, &format!("invalid {} value: {}", name, e)))
}

fn data_error(ticker: &str, reason: &str) -> SweeptraderError {
    SweeptraderError::Data {
        ticker: ticker.to_string(),
        reason: reason.to_string(),
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, SweeptraderError> {
        let bars = self.read_all(ticker)?;
        Ok(bars
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect())
    }

    fn list_tickers(&self) -> Result<Vec<String>, SweeptraderError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| SweeptraderError::Data {
            ticker: "*".to_string(),
            reason: format!("failed to read directory {}: {}", self.data_dir.display(), e),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(SweeptraderError::Io)?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(RAW_DATA_SUFFIX) {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SweeptraderError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }

        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
