//! Builds a [`DependencyGraph`] from the formulas of a workbook.

use std::collections::HashSet;

use graphedexcel_common::constants::DEFAULT_MAX_RANGE_CELLS;
use graphedexcel_common::error::Result;
use graphedexcel_common::types::CellRef;
use graphedexcel_formula::functions::FunctionStats;
use graphedexcel_workbook::FormulaSource;
use serde::Serialize;

use crate::graph::DependencyGraph;

/// A formula that could not be analysed and was left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFormula {
    /// Qualified name of the cell.
    pub cell: String,
    /// The formula text.
    pub formula: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of walking a workbook.
#[derive(Debug, Default)]
pub struct Analysis {
    /// The dependency graph.
    pub graph: DependencyGraph,
    /// Function usage across all analysed formulas.
    pub functions: FunctionStats,
    /// Number of formula cells seen, skipped ones included.
    pub formula_count: usize,
    /// Formulas the lexer rejected.
    pub skipped: Vec<SkippedFormula>,
}

/// Walks every formula of a [`FormulaSource`] and records its references.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    expand_ranges: bool,
    max_range_cells: u64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            expand_ranges: false,
            max_range_cells: DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

impl GraphBuilder {
    /// Creates a builder that keeps ranges as single nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also links every range node to each cell it covers.
    #[must_use]
    pub const fn expand_ranges(mut self, expand: bool) -> Self {
        self.expand_ranges = expand;
        self
    }

    /// Ranges larger than this are not expanded.
    #[must_use]
    pub const fn max_range_cells(mut self, max: u64) -> Self {
        self.max_range_cells = max;
        self
    }

    /// Reads every sheet of `source` and builds the dependency graph.
    ///
    /// Each formula cell gets an edge to every distinct cell or range it
    /// references; references without a sheet resolve to the cell's own
    /// sheet. Formulas without references add no node.
    ///
    /// # Errors
    ///
    /// Returns an error if a sheet cannot be read. Malformed formulas are
    /// skipped and reported in [`Analysis::skipped`] instead.
    pub fn build<S: FormulaSource + ?Sized>(&self, source: &mut S) -> Result<Analysis> {
        let mut analysis = Analysis::default();

        for sheet in source.sheet_names() {
            tracing::debug!(sheet = %sheet, "analyzing sheet");
            for cell in source.formulas(&sheet)? {
                analysis.formula_count += 1;
                let cell_ref = CellRef::cell(sheet.as_str(), cell.address);
                tracing::debug!(cell = %cell_ref, formula = %cell.formula, "formula");

                let parsed = match graphedexcel_formula::analyze(&cell.formula) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        tracing::warn!(cell = %cell_ref, error = %e, "skipping formula");
                        analysis.skipped.push(SkippedFormula {
                            cell: cell_ref.to_string(),
                            formula: cell.formula,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                analysis.functions.record_analysis(&parsed);

                let mut seen = HashSet::new();
                for raw in &parsed.references {
                    let dependency = raw.qualify(&sheet);
                    if !seen.insert(dependency.clone()) {
                        continue;
                    }
                    tracing::debug!(depends_on = %dependency, "dependency");
                    let _ = analysis.graph.add_dependency(&cell_ref, &dependency);
                    if self.expand_ranges && dependency.target.is_range() {
                        self.expand_range(&mut analysis.graph, &dependency);
                    }
                }
            }
        }

        tracing::info!(
            formulas = analysis.formula_count,
            nodes = analysis.graph.node_count(),
            edges = analysis.graph.edge_count(),
            skipped = analysis.skipped.len(),
            "dependency graph built"
        );
        Ok(analysis)
    }

    fn expand_range(&self, graph: &mut DependencyGraph, range: &CellRef) {
        let size = range.target.cell_count();
        if size > self.max_range_cells {
            tracing::debug!(range = %range, size, "range too large to expand");
            return;
        }
        for address in range.target.cells() {
            let _ = graph.add_dependency(range, &CellRef::cell(range.sheet.as_str(), address));
        }
    }
}

#[cfg(test)]
mod tests {
    use graphedexcel_workbook::InMemoryWorkbook;

    use super::*;

    fn build(workbook: InMemoryWorkbook, builder: &GraphBuilder) -> Analysis {
        let mut workbook = workbook;
        builder.build(&mut workbook).expect("should build")
    }

    #[test]
    fn single_sheet_dependencies() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("Sheet1", [("C1", "=A1+B1"), ("D1", "=C1*2")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());

        assert_eq!(analysis.formula_count, 2);
        assert_eq!(analysis.graph.node_count(), 4);
        assert_eq!(analysis.graph.edge_count(), 3);
        assert_eq!(
            analysis.graph.dependencies_of("Sheet1!C1"),
            Some(vec!["Sheet1!A1", "Sheet1!B1"])
        );
        assert_eq!(analysis.graph.dependents_of("Sheet1!C1"), Some(vec!["Sheet1!D1"]));
    }

    #[test]
    fn cross_sheet_references_keep_their_sheet() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("Inputs", [("A2", "=A1")])
            .and_then(|w| w.with_sheet("Report", [("B1", "=Inputs!A2+'Inputs'!A1")]))
            .expect("valid sheets");
        let analysis = build(workbook, &GraphBuilder::new());

        assert_eq!(
            analysis.graph.dependencies_of("Report!B1"),
            Some(vec!["Inputs!A2", "Inputs!A1"])
        );
        assert_eq!(analysis.graph.degree("Inputs!A2"), Some(2));
    }

    #[test]
    fn repeated_references_add_one_edge() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("B1", "=A1*A1+$A$1")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.graph.edge_count(), 1);
    }

    #[test]
    fn constant_formulas_add_no_nodes() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("A1", "=1+2"), ("A2", "=TODAY()")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.formula_count, 2);
        assert!(analysis.graph.is_empty());
        assert_eq!(analysis.functions.count("TODAY"), 1);
    }

    #[test]
    fn ranges_are_single_nodes_by_default() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("A4", "=SUM(A1:A3)")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.graph.node_count(), 2);
        assert!(analysis.graph.node("S!A1:A3").is_some());
        assert!(analysis.graph.node("S!A1").is_none());
    }

    #[test]
    fn single_cell_range_is_the_cell_node() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("B1", "=SUM(A1:A1)+$A$1:A1+A1")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.graph.edge_count(), 1);
        assert_eq!(analysis.graph.dependencies_of("S!B1"), Some(vec!["S!A1"]));
        assert!(analysis.graph.node("S!A1:A1").is_none());
    }

    #[test]
    fn expanded_ranges_link_member_cells() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("A4", "=SUM(A1:A3)")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new().expand_ranges(true));
        assert_eq!(analysis.graph.node_count(), 5);
        assert_eq!(
            analysis.graph.dependencies_of("S!A1:A3"),
            Some(vec!["S!A1", "S!A2", "S!A3"])
        );
    }

    #[test]
    fn oversized_ranges_are_not_expanded() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("Z1", "=SUM(A1:B10)")])
            .expect("valid sheet");
        let builder = GraphBuilder::new().expand_ranges(true).max_range_cells(10);
        let analysis = build(workbook, &builder);
        assert_eq!(analysis.graph.node_count(), 2);
    }

    #[test]
    fn malformed_formula_is_skipped() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("A1", "=\"unterminated"), ("A2", "=B2")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.formula_count, 2);
        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.skipped[0].cell, "S!A1");
        assert_eq!(analysis.graph.edge_count(), 1);
    }

    #[test]
    fn functions_are_counted_across_sheets() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("A", [("A1", "=SUM(B1:B2)"), ("A2", "=MAX(B1)+SUM(B3)")])
            .and_then(|w| w.with_sheet("B", [("A1", "=SUM(C1)")]))
            .expect("valid sheets");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.functions.sorted(), vec![("SUM", 3), ("MAX", 1)]);
    }

    #[test]
    fn self_reference_is_a_circular_reference() {
        let workbook = InMemoryWorkbook::new()
            .with_sheet("S", [("A1", "=A1+1")])
            .expect("valid sheet");
        let analysis = build(workbook, &GraphBuilder::new());
        assert_eq!(analysis.graph.circular_references(), vec![vec!["S!A1".to_string()]]);
    }
}
