//! # graphedexcel: formula dependency mapper
//!
//! Reads an Excel workbook, builds the graph of which cells each formula
//! reads, prints a summary, and draws the graph.

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::execute(cli)
}

/// Log level used when `RUST_LOG` is not set.
const fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}
