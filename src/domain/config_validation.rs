//! Configuration validation.
//!
//! Validates every sweep config field before a run so configuration errors
//! surface immediately and are never partially applied.

use crate::domain::error::SweeptraderError;
use crate::domain::params::{
    parse_periods, parse_triples, KdjParams, MacdParams, ParamGrid,
};
use crate::ports::config_port::ConfigPort;

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), SweeptraderError> {
    validate_data_dir(config)?;
    validate_results_dir(config)?;
    build_param_grid(config)?.validate()?;
    validate_save_threshold(config)?;
    Ok(())
}

/// Assemble the five axes from the `[sweep]` section.
pub fn build_param_grid(config: &dyn ConfigPort) -> Result<ParamGrid, SweeptraderError> {
    Ok(ParamGrid {
        ma_periods: parse_periods("ma_periods", &require(config, "sweep", "ma_periods")?)?,
        rsi_periods: parse_periods("rsi_periods", &require(config, "sweep", "rsi_periods")?)?,
        macd_params: parse_triples("macd_params", &require(config, "sweep", "macd_params")?)?
            .into_iter()
            .map(|(fast, slow, signal)| MacdParams { fast, slow, signal })
            .collect(),
        willr_periods: parse_periods(
            "willr_periods",
            &require(config, "sweep", "willr_periods")?,
        )?,
        kdj_params: parse_triples("kdj_params", &require(config, "sweep", "kdj_params")?)?
            .into_iter()
            .map(|(rsv, k, d)| KdjParams { rsv, k, d })
            .collect(),
    })
}

fn require(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, SweeptraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(SweeptraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), SweeptraderError> {
    require(config, "data", "data_dir").map(|_| ())
}

fn validate_results_dir(config: &dyn ConfigPort) -> Result<(), SweeptraderError> {
    require(config, "data", "results_dir").map(|_| ())
}

fn validate_save_threshold(config: &dyn ConfigPort) -> Result<(), SweeptraderError> {
    let value = config.get_double("sweep", "save_threshold", 4.0);
    if value < 0.0 {
        return Err(SweeptraderError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "save_threshold".to_string(),
            reason: "save_threshold must be non-negative".to_string(),
        });
    }
    Ok(())
}
