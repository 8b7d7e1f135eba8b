//! Domain error types.

/// Top-level error type for sweeptrader.
#[derive(Debug, thiserror::Error)]
pub enum SweeptraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid rule set: {reason}")]
    RuleInvalid { reason: String },

    #[error("bad price data for {ticker}: {reason}")]
    Data { ticker: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SweeptraderError> for std::process::ExitCode {
    fn from(err: &SweeptraderError) -> Self {
        let code: u8 = match err {
            SweeptraderError::Io(_) => 1,
            SweeptraderError::ConfigParse { .. }
            | SweeptraderError::ConfigMissing { .. }
            | SweeptraderError::ConfigInvalid { .. } => 2,
            SweeptraderError::RuleInvalid { .. } => 4,
            SweeptraderError::Data { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
