//! `graphedexcel analyze`: print the dependency summary and draw the graph.

use std::path::PathBuf;

use clap::Args;
use graphedexcel_common::constants::{DEFAULT_IMAGE_DIR, DEFAULT_LAYOUT_SEED, DEFAULT_WORKBOOK};
use graphedexcel_graph::render::{ImageFormat, render, write_image};
use graphedexcel_graph::{Analysis, Summary};

use super::{ImageFormatArg, load_analysis, render_options};
use crate::output::{DIM, RESET, image_path};

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Workbook to analyse.
    #[arg(default_value = DEFAULT_WORKBOOK)]
    pub file: PathBuf,

    /// Print the summary only, skip drawing the graph.
    #[arg(long)]
    pub no_visualize: bool,

    /// Draw edges as arrows from a formula to what it reads.
    #[arg(long)]
    pub keep_direction: bool,

    /// Link every range node to the cells it covers.
    #[arg(long)]
    pub expand_ranges: bool,

    /// Image format.
    #[arg(long, value_enum, default_value_t = ImageFormatArg::Svg)]
    pub format: ImageFormatArg,

    /// Directory the image is written to.
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    pub output_dir: PathBuf,

    /// JSON or YAML file with drawing settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed of the graph layout.
    #[arg(long, default_value_t = DEFAULT_LAYOUT_SEED)]
    pub seed: u64,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `analyze` command.
///
/// Builds the graph of `file`, prints its summary to stdout, and unless
/// `--no-visualize` is given writes the drawing under `--output-dir`.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read, the style file is
/// invalid, or the image cannot be written.
pub fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let analysis = load_analysis(&args.file, args.expand_ranges)?;
    let summary = Summary::from_analysis(&analysis);

    print!("{}", summary_output(&summary, args.json)?);

    if args.no_visualize {
        return Ok(());
    }

    #[allow(clippy::print_stderr)]
    {
        eprintln!("{DIM}Visualizing the graph of dependencies.\nThis might take a while...{RESET}");
    }
    let path = draw(&analysis, &args)?;
    #[allow(clippy::print_stderr)]
    {
        eprintln!("{DIM}Graph written to {}{RESET}", path.display());
    }
    Ok(())
}

/// What `analyze` prints to stdout: the fixed-width report, or pretty JSON
/// followed by a newline.
fn summary_output(summary: &Summary, json: bool) -> anyhow::Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(summary)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(summary.render_text())
    }
}

fn draw(analysis: &Analysis, args: &AnalyzeArgs) -> anyhow::Result<PathBuf> {
    let format = ImageFormat::from(args.format);
    let options = render_options(args.keep_direction, args.seed, args.config.as_deref())?;
    let path = image_path(&args.output_dir, &args.file, format.extension());
    tracing::debug!(
        nodes = analysis.graph.node_count(),
        path = %path.display(),
        "rendering graph"
    );
    write_image(&path, &render(&analysis.graph, format, &options))?;
    Ok(path)
}
