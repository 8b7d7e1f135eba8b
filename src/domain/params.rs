//! Indicator parameterizations and the sweep grid.
//!
//! A `ParamSet` is one point in the cross-product of the five axes; its
//! `Display` form is the artifact-key fragment shared with the result sink.

use std::fmt;

use crate::domain::error::SweeptraderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KdjParams {
    pub rsv: usize,
    pub k: usize,
    pub d: usize,
}

/// One parameter combination = one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamSet {
    pub ma: usize,
    pub rsi: usize,
    pub macd: MacdParams,
    pub willr: usize,
    pub kdj: KdjParams,
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MA({})_RSI({})_MACD({},{},{})_WILLR({})_KDJ({},{},{})",
            self.ma,
            self.rsi,
            self.macd.fast,
            self.macd.slow,
            self.macd.signal,
            self.willr,
            self.kdj.rsv,
            self.kdj.k,
            self.kdj.d,
        )
    }
}

/// The five parameter axes of a sweep.
#[derive(Debug, Clone, Default)]
pub struct ParamGrid {
    pub ma_periods: Vec<usize>,
    pub rsi_periods: Vec<usize>,
    pub macd_params: Vec<MacdParams>,
    pub willr_periods: Vec<usize>,
    pub kdj_params: Vec<KdjParams>,
}

impl ParamGrid {
    /// Reject empty axes, non-positive periods and MACD fast >= slow before
    /// any combination runs.
    pub fn validate(&self) -> Result<(), SweeptraderError> {
        check_axis("ma_periods", &self.ma_periods)?;
        check_axis("rsi_periods", &self.rsi_periods)?;
        check_axis("willr_periods", &self.willr_periods)?;

        if self.macd_params.is_empty() {
            return Err(axis_error("macd_params", "axis is empty"));
        }
        for macd in &self.macd_params {
            if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
                return Err(axis_error("macd_params", "periods must be positive"));
            }
            if macd.fast >= macd.slow {
                return Err(axis_error(
                    "macd_params",
                    &format!("fast ({}) must be less than slow ({})", macd.fast, macd.slow),
                ));
            }
        }

        if self.kdj_params.is_empty() {
            return Err(axis_error("kdj_params", "axis is empty"));
        }
        for kdj in &self.kdj_params {
            if kdj.rsv == 0 || kdj.k == 0 || kdj.d == 0 {
                return Err(axis_error("kdj_params", "periods must be positive"));
            }
        }

        Ok(())
    }

    /// Full cross-product in nested order ma -> rsi -> macd -> willr -> kdj.
    /// The order fixes the pre-sort output, nothing more.
    pub fn combinations(&self) -> Vec<ParamSet> {
        let mut combos =
            Vec::with_capacity(self.ma_periods.len() * self.rsi_periods.len());
        for &ma in &self.ma_periods {
            for &rsi in &self.rsi_periods {
                for &macd in &self.macd_params {
                    for &willr in &self.willr_periods {
                        for &kdj in &self.kdj_params {
                            combos.push(ParamSet {
                                ma,
                                rsi,
                                macd,
                                willr,
                                kdj,
                            });
                        }
                    }
                }
            }
        }
        combos
    }
}

fn check_axis(name: &str, axis: &[usize]) -> Result<(), SweeptraderError> {
    if axis.is_empty() {
        return Err(axis_error(name, "axis is empty"));
    }
    if axis.contains(&0) {
        return Err(axis_error(name, "periods must be positive"));
    }
    Ok(())
}

fn axis_error(key: &str, reason: &str) -> SweeptraderError {
    SweeptraderError::ConfigInvalid {
        section: "sweep".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a comma-separated period list, e.g. `"5,10,20"`. De-duplicates
/// preserving first-seen order; custom free-text entries go through here too.
pub fn parse_periods(section_key: &str, input: &str) -> Result<Vec<usize>, SweeptraderError> {
    let mut out: Vec<usize> = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        let period: usize = trimmed.parse().map_err(|_| {
            axis_error(section_key, &format!("'{}' is not a positive integer", trimmed))
        })?;
        if !out.contains(&period) {
            out.push(period);
        }
    }
    Ok(out)
}

/// Parse a semicolon-separated list of integer triples, with or without
/// parentheses: `"12,26,9"` or `"(12,26,9);(24,52,9)"`.
pub fn parse_triples(
    section_key: &str,
    input: &str,
) -> Result<Vec<(usize, usize, usize)>, SweeptraderError> {
    let mut out: Vec<(usize, usize, usize)> = Vec::new();
    for token in input.split(';') {
        let trimmed = token.trim().trim_start_matches('(').trim_end_matches(')');
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(axis_error(
                section_key,
                &format!("'{}' is not a comma-separated triple", token.trim()),
            ));
        }

        let mut values = [0usize; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                axis_error(section_key, &format!("'{}' is not a positive integer", part))
            })?;
        }

        let triple = (values[0], values[1], values[2]);
        if !out.contains(&triple) {
            out.push(triple);
        }
    }
    Ok(out)
}

/// Append custom entries to an axis, dropping duplicates.
pub fn merge_axis<T: PartialEq + Copy>(base: &mut Vec<T>, extra: &[T]) {
    for &value in extra {
        if !base.contains(&value) {
            base.push(value);
        }
    }
}
