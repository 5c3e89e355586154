//! gendata CLI
//!
//! Flattens JSON and JSONC documents into ordered records.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::flatten::{FlattenOverrides, run_flatten};
use crate::commands::init::run_init;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Flatten {
            file,
            format,
            paths,
            separator,
            max_depth,
            leaves_only,
            depth,
        } => {
            let overrides = FlattenOverrides {
                paths: *paths,
                separator: separator.as_deref(),
                max_depth: *max_depth,
                leaves_only: *leaves_only,
                depth: *depth,
            };
            run_flatten(cli, file.as_deref(), *format, &overrides)
        }
        Commands::Init { force } => run_init(*force),
    }
}
