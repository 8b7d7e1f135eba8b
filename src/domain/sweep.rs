//! Grid-search sweep driver.
//!
//! Enumerates the full parameter cross-product and runs each combination
//! through indicator computation, signal tracking and metrics. Combinations
//! are independent (they share only the immutable price series), so the
//! sweep fans out over a rayon worker pool and merges per-worker rows before
//! the final sort. Interrupting a sweep between combinations leaves a partial
//! artifact set; callers are warned, results are not resumable.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::domain::error::SweeptraderError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::metrics::RunMetrics;
use crate::domain::ohlcv::{validate_series, PriceBar};
use crate::domain::params::{ParamGrid, ParamSet};
use crate::domain::rule::SignalRules;
use crate::domain::tracker::track_positions;
use crate::ports::result_port::ResultSink;

#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Combinations whose profit factor exceeds this get their full frame
    /// persisted. An undefined factor never qualifies.
    pub save_threshold: f64,
    /// Clear artifacts from prior sweeps before running. Off by default; the
    /// caller opts into the destructive clear explicitly.
    pub replace_artifacts: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        SweepSettings {
            save_threshold: 4.0,
            replace_artifacts: false,
        }
    }
}

/// One line of the ranked summary.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub params: ParamSet,
    pub metrics: RunMetrics,
}

/// An isolated per-combination artifact write failure. Sibling combinations
/// are unaffected and the row still appears in the summary.
#[derive(Debug, Clone)]
pub struct ArtifactFailure {
    pub params: ParamSet,
    pub reason: String,
}

#[derive(Debug)]
pub struct SweepOutcome {
    /// Exactly one row per enumerated combination, sorted by profit factor
    /// descending with undefined factors last.
    pub rows: Vec<SummaryRow>,
    pub failures: Vec<ArtifactFailure>,
}

/// Run one combination: annotate, track, measure.
pub fn run_combination(bars: &[PriceBar], params: &ParamSet, rules: &SignalRules) -> (IndicatorFrame, RunMetrics) {
    let mut frame = IndicatorFrame::compute(bars, params);
    let trades = track_positions(&mut frame, rules);
    let metrics = RunMetrics::from_trades(&trades);
    (frame, metrics)
}

/// Run the full sweep for one ticker.
///
/// Grid and data problems abort before any combination executes; a short
/// price series is not a problem (undefined indicators simply never fire,
/// leaving a zero-trade row).
pub fn run_sweep(
    ticker: &str,
    bars: &[PriceBar],
    grid: &ParamGrid,
    rules: &SignalRules,
    settings: &SweepSettings,
    sink: &dyn ResultSink,
) -> Result<SweepOutcome, SweeptraderError> {
    grid.validate()?;
    validate_series(ticker, bars)?;
    sink.prepare(settings.replace_artifacts)?;

    let combos = grid.combinations();
    eprintln!(
        "Sweeping {} combinations for {} over {} bars",
        combos.len(),
        ticker,
        bars.len()
    );

    let results: Vec<(SummaryRow, Option<ArtifactFailure>)> = combos
        .par_iter()
        .map(|params| {
            let (frame, metrics) = run_combination(bars, params, rules);

            let failure = if qualifies(&metrics, settings.save_threshold) {
                sink.write_frame(ticker, params, &frame)
                    .err()
                    .map(|e| ArtifactFailure {
                        params: *params,
                        reason: e.to_string(),
                    })
            } else {
                None
            };

            (
                SummaryRow {
                    params: *params,
                    metrics,
                },
                failure,
            )
        })
        .collect();

    let mut rows = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (row, failure) in results {
        rows.push(row);
        failures.extend(failure);
    }

    sort_rows(&mut rows);
    sink.write_summary(ticker, &rows)?;

    Ok(SweepOutcome { rows, failures })
}

fn qualifies(metrics: &RunMetrics, threshold: f64) -> bool {
    matches!(metrics.profit_factor, Some(pf) if pf > threshold)
}

/// Profit factor descending, undefined strictly last. Stable, so equal rows
/// keep the deterministic enumeration order.
pub fn sort_rows(rows: &mut [SummaryRow]) {
    rows.sort_by(|a, b| match (a.metrics.profit_factor, b.metrics.profit_factor) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
