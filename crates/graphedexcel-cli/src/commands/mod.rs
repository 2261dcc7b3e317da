//! CLI command definitions and dispatch.

pub mod analyze;
pub mod deps;
pub mod export;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use graphedexcel_common::config::VisualConfig;
use graphedexcel_common::constants::BIN_NAME;
use graphedexcel_graph::Analysis;
use graphedexcel_graph::GraphBuilder;
use graphedexcel_graph::layout::SpringParams;
use graphedexcel_graph::render::{ImageFormat, RenderOptions};
use graphedexcel_workbook::XlsxWorkbook;

/// Map the formula dependencies of an Excel workbook.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log every sheet, formula, and dependency while analysing.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarise the dependency graph and draw it.
    Analyze(analyze::AnalyzeArgs),
    /// List what a cell reads, or what reads it.
    Deps(deps::DepsArgs),
    /// Write the graph as JSON, SVG, or Graphviz DOT.
    Export(export::ExportArgs),
}

/// Image formats selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormatArg {
    /// SVG drawing with a spring layout.
    Svg,
    /// Graphviz DOT source.
    Dot,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Svg => Self::Svg,
            ImageFormatArg::Dot => Self::Dot,
        }
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Analyze(args) => analyze::execute(args),
        Command::Deps(args) => deps::execute(args),
        Command::Export(args) => export::execute(args),
    }
}

/// Opens `file` and builds its dependency graph.
fn load_analysis(file: &Path, expand_ranges: bool) -> anyhow::Result<Analysis> {
    let mut workbook = XlsxWorkbook::open(file)?;
    GraphBuilder::new()
        .expand_ranges(expand_ranges)
        .build(&mut workbook)
        .with_context(|| format!("failed to analyse {}", file.display()))
}

/// Collects render options from flags and an optional style file.
fn render_options(
    keep_direction: bool,
    seed: u64,
    style_file: Option<&Path>,
) -> anyhow::Result<RenderOptions> {
    let style = match style_file {
        Some(path) => VisualConfig::load(path)
            .with_context(|| format!("failed to load style file {}", path.display()))?,
        None => VisualConfig::default(),
    };
    Ok(RenderOptions {
        keep_direction,
        layout: SpringParams {
            seed,
            ..SpringParams::default()
        },
        style,
    })
}
