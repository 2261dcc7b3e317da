//! # graphedexcel-graph
//!
//! Dependency graph of spreadsheet cells.
//!
//! Handles:
//! - **Graph**: `petgraph` storage of cells, ranges, and dependency edges.
//! - **Builder**: walking a [`FormulaSource`](graphedexcel_workbook::FormulaSource)
//!   and turning formulas into edges.
//! - **Summary**: node/edge counts, highest-degree nodes, function usage.
//! - **Layout**: force-directed node placement.
//! - **Render**: SVG and Graphviz DOT output.
//! - **Export**: JSON snapshot of the whole analysis.

pub mod builder;
pub mod export;
pub mod graph;
pub mod layout;
pub mod render;
pub mod summary;

pub use builder::{Analysis, GraphBuilder, SkippedFormula};
pub use graph::{CellNode, DependencyGraph, NodeKind};
pub use summary::Summary;
