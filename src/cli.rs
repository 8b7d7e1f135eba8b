//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_result_adapter::CsvResultSink;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::yaml_rules_adapter::YamlRulesAdapter;
use crate::domain::config_validation::{build_param_grid, validate_sweep_config};
use crate::domain::error::SweeptraderError;
use crate::domain::params::{merge_axis, parse_periods, parse_triples, KdjParams, MacdParams, ParamGrid};
use crate::domain::sweep::{run_sweep, SweepSettings};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::rules_port::RulesPort;

const DEFAULT_RULES_PATH: &str = "signals.yaml";

#[derive(Parser, Debug)]
#[command(name = "sweeptrader", about = "Grid-search backtester for rule-based trading signals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a parameter sweep for one ticker
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: String,
        /// Rule file override (default: [rules] path from the config)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Extra MA periods, e.g. "25,50"
        #[arg(long)]
        ma: Option<String>,
        /// Extra RSI periods
        #[arg(long)]
        rsi: Option<String>,
        /// Extra MACD triples, e.g. "(6,13,5);(12,26,9)"
        #[arg(long)]
        macd: Option<String>,
        /// Extra Williams %R periods
        #[arg(long)]
        willr: Option<String>,
        /// Extra KDJ triples
        #[arg(long)]
        kdj: Option<String>,
        /// Profit-factor threshold for persisting a combination's frame
        #[arg(long)]
        threshold: Option<f64>,
        /// Delete artifacts from prior sweeps before running (destructive)
        #[arg(long)]
        replace_artifacts: bool,
    },
    /// Validate a rule file
    Validate {
        #[arg(short, long)]
        rules: PathBuf,
    },
    /// List tickers with price history
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Sweep {
            config,
            ticker,
            rules,
            ma,
            rsi,
            macd,
            willr,
            kdj,
            threshold,
            replace_artifacts,
        } => {
            let overrides = AxisOverrides {
                ma,
                rsi,
                macd,
                willr,
                kdj,
            };
            run_sweep_command(
                &config,
                &ticker,
                rules.as_ref(),
                &overrides,
                threshold,
                replace_artifacts,
            )
        }
        Command::Validate { rules } => run_validate(&rules),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

/// Free-text axis additions from the command line, merged into the configured
/// grid and de-duplicated.
#[derive(Debug, Default)]
pub struct AxisOverrides {
    pub ma: Option<String>,
    pub rsi: Option<String>,
    pub macd: Option<String>,
    pub willr: Option<String>,
    pub kdj: Option<String>,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SweeptraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Configured axes plus CLI custom entries.
pub fn build_grid_with_overrides(
    config: &dyn ConfigPort,
    overrides: &AxisOverrides,
) -> Result<ParamGrid, SweeptraderError> {
    let mut grid = build_param_grid(config)?;

    if let Some(input) = &overrides.ma {
        merge_axis(&mut grid.ma_periods, &parse_periods("ma_periods", input)?);
    }
    if let Some(input) = &overrides.rsi {
        merge_axis(&mut grid.rsi_periods, &parse_periods("rsi_periods", input)?);
    }
    if let Some(input) = &overrides.macd {
        let extra: Vec<MacdParams> = parse_triples("macd_params", input)?
            .into_iter()
            .map(|(fast, slow, signal)| MacdParams { fast, slow, signal })
            .collect();
        merge_axis(&mut grid.macd_params, &extra);
    }
    if let Some(input) = &overrides.willr {
        merge_axis(
            &mut grid.willr_periods,
            &parse_periods("willr_periods", input)?,
        );
    }
    if let Some(input) = &overrides.kdj {
        let extra: Vec<KdjParams> = parse_triples("kdj_params", input)?
            .into_iter()
            .map(|(rsv, k, d)| KdjParams { rsv, k, d })
            .collect();
        merge_axis(&mut grid.kdj_params, &extra);
    }

    grid.validate()?;
    Ok(grid)
}

pub fn build_settings(
    config: &dyn ConfigPort,
    threshold_override: Option<f64>,
    replace_flag: bool,
) -> SweepSettings {
    let defaults = SweepSettings::default();
    SweepSettings {
        save_threshold: threshold_override
            .unwrap_or_else(|| config.get_double("sweep", "save_threshold", defaults.save_threshold)),
        replace_artifacts: replace_flag
            || config.get_bool("sweep", "replace_artifacts", defaults.replace_artifacts),
    }
}

pub fn resolve_rules_path(config: &dyn ConfigPort, cli_override: Option<&PathBuf>) -> PathBuf {
    match cli_override {
        Some(path) => path.clone(),
        None => PathBuf::from(
            config
                .get_string("rules", "path")
                .unwrap_or_else(|| DEFAULT_RULES_PATH.to_string()),
        ),
    }
}

fn data_dirs(config: &dyn ConfigPort) -> (PathBuf, PathBuf) {
    let data_dir = PathBuf::from(
        config
            .get_string("data", "data_dir")
            .unwrap_or_else(|| "data".to_string()),
    );
    let results_dir = PathBuf::from(
        config
            .get_string("data", "results_dir")
            .unwrap_or_else(|| "data_results".to_string()),
    );
    (data_dir, results_dir)
}

fn run_sweep_command(
    config_path: &PathBuf,
    ticker: &str,
    rules_override: Option<&PathBuf>,
    overrides: &AxisOverrides,
    threshold_override: Option<f64>,
    replace_flag: bool,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_sweep_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: assemble the grid (config axes + custom entries)
    let grid = match build_grid_with_overrides(&adapter, overrides) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: load rules (fail fast, before any combination)
    let rules_path = resolve_rules_path(&adapter, rules_override);
    eprintln!("Loading rules from {}", rules_path.display());
    let rules = match YamlRulesAdapter::new(rules_path).load() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: fetch price history
    let (data_dir, results_dir) = data_dirs(&adapter);
    let data_port = CsvDataAdapter::new(data_dir.clone());
    let bars = match data_port.fetch_bars(ticker, None, None) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} bars for {}", bars.len(), ticker);

    // Stage 5: run the sweep
    let settings = build_settings(&adapter, threshold_override, replace_flag);
    if settings.replace_artifacts {
        eprintln!(
            "Warning: replacing all artifacts under {}",
            results_dir.display()
        );
    }
    eprintln!("Note: interrupting a sweep leaves a partial artifact set");

    let sink = CsvResultSink::new(data_dir, results_dir);
    let outcome = match run_sweep(ticker, &bars, &grid, &rules, &settings, &sink) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for failure in &outcome.failures {
        eprintln!(
            "Warning: failed to write artifact for {}: {}",
            failure.params, failure.reason
        );
    }

    let qualifying = outcome
        .rows
        .iter()
        .filter(|r| matches!(r.metrics.profit_factor, Some(pf) if pf > settings.save_threshold))
        .count();
    println!(
        "Swept {} combinations for {}: {} above threshold {}, summary at {}",
        outcome.rows.len(),
        ticker,
        qualifying,
        settings.save_threshold,
        sink.summary_path(ticker).display()
    );

    ExitCode::SUCCESS
}

fn run_validate(rules_path: &PathBuf) -> ExitCode {
    match YamlRulesAdapter::new(rules_path.clone()).load() {
        Ok(_) => {
            println!("{}: rules OK", rules_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let (data_dir, _) = data_dirs(&adapter);

    match CsvDataAdapter::new(data_dir).list_tickers() {
        Ok(tickers) => {
            for ticker in tickers {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let (data_dir, _) = data_dirs(&adapter);
    let data_port = CsvDataAdapter::new(data_dir);

    let tickers = match ticker {
        Some(t) => vec![t.to_string()],
        None => match data_port.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    for ticker in tickers {
        match data_port.data_range(&ticker) {
            Ok(Some((first, last, count))) => {
                println!("{ticker}: {count} bars from {first} to {last}");
            }
            Ok(None) => println!("{ticker}: no data"),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}
