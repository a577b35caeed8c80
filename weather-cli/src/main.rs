//! Binary crate for the `weather-card` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and layering them over the config file
//! - Logging setup
//! - Running acquisition and rendering once, then exiting

use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

mod cli;

fn init_logging(verbose: bool) {
    // Without -v the only stderr output is the failure line from `report`.
    let default = if verbose { "info" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// The single diagnostic line for a failed run: stage context, then causes.
fn report(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cmd = cli::Cli::parse();

    let result = match cmd.load_config() {
        Ok(config) => {
            init_logging(config.verbose.unwrap_or(false));
            cmd.run(config).await
        }
        Err(err) => {
            init_logging(cmd.verbose);
            Err(err)
        }
    };

    if let Err(err) = result {
        let line = report(&err);
        tracing::error!("{line}");
        eprintln!("{line}");
        std::process::exit(1);
    }
}
