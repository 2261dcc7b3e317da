//! JSON snapshot of an analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::builder::{Analysis, SkippedFormula};
use crate::graph::NodeKind;
use crate::summary::Summary;

/// One node with its degree.
#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    /// Qualified name.
    pub name: String,
    /// Sheet name.
    pub sheet: String,
    /// Cell or range.
    pub kind: NodeKind,
    /// In-degree plus out-degree.
    pub degree: usize,
}

/// One dependency edge.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEdge {
    /// The formula cell.
    pub from: String,
    /// What the formula reads.
    pub to: String,
}

/// Everything known about a workbook's dependencies, ready for
/// `serde_json`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    /// Workbook path as given on the command line.
    pub source: String,
    /// When the export was produced.
    pub generated_at: DateTime<Utc>,
    /// Nodes in insertion order.
    pub nodes: Vec<ExportNode>,
    /// Edges in insertion order.
    pub edges: Vec<ExportEdge>,
    /// Formulas left out of the graph.
    pub skipped: Vec<SkippedFormula>,
    /// Headline numbers.
    pub summary: Summary,
}

impl GraphExport {
    /// Captures `analysis`.
    #[must_use]
    pub fn new(analysis: &Analysis, source: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        let graph = &analysis.graph;
        Self {
            source: source.into(),
            generated_at,
            nodes: graph
                .nodes()
                .map(|node| ExportNode {
                    name: node.name.clone(),
                    sheet: node.sheet.clone(),
                    kind: node.kind,
                    degree: graph.degree(&node.name).unwrap_or_default(),
                })
                .collect(),
            edges: graph
                .edges()
                .map(|(from, to)| ExportEdge {
                    from: from.name.clone(),
                    to: to.name.clone(),
                })
                .collect(),
            skipped: analysis.skipped.clone(),
            summary: Summary::from_analysis(analysis),
        }
    }
}
