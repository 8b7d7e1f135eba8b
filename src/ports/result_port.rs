//! Result sink port.

use crate::domain::error::SweeptraderError;
use crate::domain::frame::IndicatorFrame;
use crate::domain::params::ParamSet;
use crate::domain::sweep::SummaryRow;

/// Receives sweep outputs. `Sync` because qualifying frames are written from
/// the worker pool; artifact keys derived from the full parameter tuple keep
/// workers from colliding.
pub trait ResultSink: Sync {
    /// Create the artifact location. With `replace` set, any artifacts from a
    /// prior sweep are removed first; that destructive step is an explicit
    /// caller opt-in.
    fn prepare(&self, replace: bool) -> Result<(), SweeptraderError>;

    /// Persist the full annotated frame of one qualifying combination.
    fn write_frame(
        &self,
        ticker: &str,
        params: &ParamSet,
        frame: &IndicatorFrame,
    ) -> Result<(), SweeptraderError>;

    /// Persist the ranked summary table, one row per combination.
    fn write_summary(&self, ticker: &str, rows: &[SummaryRow]) -> Result<(), SweeptraderError>;
}
