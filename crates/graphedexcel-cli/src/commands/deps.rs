//! `graphedexcel deps`: list the direct dependencies of one cell.

use std::path::PathBuf;

use clap::Args;
use graphedexcel_common::types::CellRef;

use super::load_analysis;
use crate::output::{BOLD, RESET};

/// Arguments for the `deps` command.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Workbook to analyse.
    pub file: PathBuf,

    /// Cell or range, e.g. `Sheet1!B2` or `'My Sheet'!A1:A9`.
    pub cell: String,

    /// List the formulas that read the cell instead of what it reads.
    #[arg(long)]
    pub dependents: bool,

    /// Link every range node to the cells it covers.
    #[arg(long)]
    pub expand_ranges: bool,
}

/// Executes the `deps` command.
///
/// # Errors
///
/// Returns an error if the reference is malformed, the workbook cannot be
/// read, or the cell is not part of the dependency graph.
pub fn execute(args: DepsArgs) -> anyhow::Result<()> {
    let name = CellRef::parse(&args.cell)?.to_string();
    let analysis = load_analysis(&args.file, args.expand_ranges)?;
    let lines = neighbours(&analysis.graph, &name, args.dependents)?;

    let heading = if args.dependents { "Dependents" } else { "Dependencies" };
    println!("{BOLD}{heading} of {name}{RESET}");
    if lines.is_empty() {
        println!("  (none)");
    }
    for line in lines {
        println!("  {line}");
    }
    Ok(())
}

fn neighbours(
    graph: &graphedexcel_graph::DependencyGraph,
    name: &str,
    dependents: bool,
) -> anyhow::Result<Vec<String>> {
    let found = if dependents {
        graph.dependents_of(name)
    } else {
        graph.dependencies_of(name)
    };
    let Some(found) = found else {
        anyhow::bail!("{name} does not occur in any formula");
    };
    Ok(found.into_iter().map(str::to_string).collect())
}
