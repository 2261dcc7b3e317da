//! `graphedexcel export`: write the whole graph to a file or stdout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, ValueEnum};
use graphedexcel_common::constants::DEFAULT_LAYOUT_SEED;
use graphedexcel_graph::Analysis;
use graphedexcel_graph::export::GraphExport;
use graphedexcel_graph::render::{ImageFormat, render, write_image};

use super::{load_analysis, render_options};

/// Export formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Nodes, edges, and summary as JSON.
    Json,
    /// SVG drawing.
    Svg,
    /// Graphviz DOT source.
    Dot,
}

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Workbook to analyse.
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep edge direction in SVG and DOT output.
    #[arg(long)]
    pub keep_direction: bool,

    /// Link every range node to the cells it covers.
    #[arg(long)]
    pub expand_ranges: bool,
}

/// Executes the `export` command.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read or the output cannot be
/// written.
pub fn execute(args: ExportArgs) -> anyhow::Result<()> {
    let analysis = load_analysis(&args.file, args.expand_ranges)?;
    let contents = to_format(&analysis, &args.file, args.format, args.keep_direction)?;

    match &args.output {
        Some(path) => {
            write_image(path, &contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{contents}"),
    }
    Ok(())
}

fn to_format(
    analysis: &Analysis,
    file: &Path,
    format: ExportFormat,
    keep_direction: bool,
) -> anyhow::Result<String> {
    let image = match format {
        ExportFormat::Json => {
            let export = GraphExport::new(analysis, file.display().to_string(), Utc::now());
            let mut json = serde_json::to_string_pretty(&export)?;
            json.push('\n');
            return Ok(json);
        }
        ExportFormat::Svg => ImageFormat::Svg,
        ExportFormat::Dot => ImageFormat::Dot,
    };
    let options = render_options(keep_direction, DEFAULT_LAYOUT_SEED, None)?;
    Ok(render(&analysis.graph, image, &options))
}
