//! Textual and structured summaries of an [`Analysis`].

use std::fmt::Write as _;

use graphedexcel_common::constants::{COUNT_PAD, LABEL_PAD, TOP_NODE_COUNT};
use serde::Serialize;

use crate::builder::Analysis;

/// A node and its degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDegree {
    /// Qualified node name.
    pub name: String,
    /// In-degree plus out-degree.
    pub degree: usize,
}

/// A function and how often formulas call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCount {
    /// Upper-case function name.
    pub name: String,
    /// Number of calls.
    pub count: usize,
}

/// Headline numbers of a dependency analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of cells and ranges in the graph.
    pub node_count: usize,
    /// Number of dependency edges.
    pub edge_count: usize,
    /// Number of formula cells seen.
    pub formula_count: usize,
    /// Highest-degree nodes, highest first.
    pub top_nodes: Vec<NodeDegree>,
    /// Functions by descending call count.
    pub functions: Vec<FunctionCount>,
    /// Groups of mutually dependent nodes.
    pub circular_references: Vec<Vec<String>>,
    /// Formulas that could not be analysed.
    pub skipped_formulas: usize,
}

impl Summary {
    /// Collects the summary of `analysis`.
    #[must_use]
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            node_count: analysis.graph.node_count(),
            edge_count: analysis.graph.edge_count(),
            formula_count: analysis.formula_count,
            top_nodes: analysis
                .graph
                .top_by_degree(TOP_NODE_COUNT)
                .into_iter()
                .map(|(name, degree)| NodeDegree {
                    name: name.to_string(),
                    degree,
                })
                .collect(),
            functions: analysis
                .functions
                .sorted()
                .into_iter()
                .map(|(name, count)| FunctionCount {
                    name: name.to_string(),
                    count,
                })
                .collect(),
            circular_references: analysis.graph.circular_references(),
            skipped_formulas: analysis.skipped.len(),
        }
    }

    /// Renders the fixed-width report printed by the CLI.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Dependency Graph Summary ===");
        push_row(&mut out, "Cell/Node count", self.node_count, "");
        push_row(&mut out, "Dependency count", self.edge_count, "");
        out.push('\n');

        let _ = writeln!(out, "=== Nodes with the highest degree ===");
        for node in &self.top_nodes {
            push_row(&mut out, &node.name, node.degree, " ");
        }

        let _ = writeln!(out, "\n=== Formula functions by count ===");
        for function in &self.functions {
            push_row(&mut out, &function.name, function.count, "");
        }

        if !self.circular_references.is_empty() {
            let _ = writeln!(out, "\n=== Circular references ===");
            for group in &self.circular_references {
                let _ = writeln!(out, "{}", group.join(", "));
            }
        }

        if self.skipped_formulas > 0 {
            out.push('\n');
            push_row(&mut out, "Skipped formulas", self.skipped_formulas, "");
        }
        out
    }
}

fn push_row(out: &mut String, label: &str, count: usize, suffix: &str) {
    let _ = writeln!(
        out,
        "{label:<width$}{count:>pad$}{suffix}",
        width = LABEL_PAD,
        pad = COUNT_PAD
    );
}

#[cfg(test)]
mod tests {
    use graphedexcel_workbook::InMemoryWorkbook;

    use super::*;
    use crate::builder::GraphBuilder;

    fn analysis(cells: &[(&str, &str)]) -> Analysis {
        let mut workbook = InMemoryWorkbook::new()
            .with_sheet("Sheet1", cells.iter().copied())
            .expect("valid sheet");
        GraphBuilder::new().build(&mut workbook).expect("should build")
    }

    #[test]
    fn text_layout_is_fixed_width() {
        let summary = Summary::from_analysis(&analysis(&[
            ("C1", "=SUM(A1:B1)+A1"),
            ("D1", "=C1*2"),
        ]));

        let expected = "\
=== Dependency Graph Summary ===
Cell/Node count                 4
Dependency count                3

=== Nodes with the highest degree ===
Sheet1!C1                       3 
Sheet1!A1:B1                    1 
Sheet1!A1                       1 
Sheet1!D1                       1 

=== Formula functions by count ===
SUM                             1
";
        assert_eq!(summary.render_text(), expected);
    }

    #[test]
    fn top_nodes_are_capped_at_ten() {
        let cells: Vec<(String, String)> = (1..=15)
            .map(|row| (format!("B{row}"), format!("=A{row}")))
            .collect();
        let borrowed: Vec<(&str, &str)> = cells
            .iter()
            .map(|(a, f)| (a.as_str(), f.as_str()))
            .collect();
        let summary = Summary::from_analysis(&analysis(&borrowed));
        assert_eq!(summary.node_count, 30);
        assert_eq!(summary.top_nodes.len(), TOP_NODE_COUNT);
    }

    #[test]
    fn circular_and_skipped_sections_only_when_present() {
        let clean = Summary::from_analysis(&analysis(&[("B1", "=A1")])).render_text();
        assert!(!clean.contains("Circular"));
        assert!(!clean.contains("Skipped"));

        let dirty = Summary::from_analysis(&analysis(&[
            ("A1", "=B1"),
            ("B1", "=A1"),
            ("C1", "=\"open"),
        ]))
        .render_text();
        assert!(dirty.contains("=== Circular references ===\nSheet1!A1, Sheet1!B1\n"));
        assert!(dirty.contains("Skipped formulas                1\n"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = Summary::from_analysis(&analysis(&[("B1", "=MAX(A1)")]));
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["node_count"], 2);
        assert_eq!(json["functions"][0]["name"], "MAX");
        assert_eq!(json["top_nodes"][0]["name"], "Sheet1!B1");
    }
}
