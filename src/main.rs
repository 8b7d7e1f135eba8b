use clap::Parser;
use sweeptrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
