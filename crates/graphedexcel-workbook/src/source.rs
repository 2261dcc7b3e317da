//! Workbook abstraction consumed by the graph builder.

use graphedexcel_common::error::Result;
use graphedexcel_common::types::CellAddress;

/// A cell whose content is a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaCell {
    /// Position of the cell on its sheet.
    pub address: CellAddress,
    /// Formula text, always starting with `=`.
    pub formula: String,
}

impl FormulaCell {
    /// Creates a formula cell, prefixing `=` when the text lacks it.
    pub fn new(address: CellAddress, formula: impl Into<String>) -> Self {
        let formula = formula.into();
        let formula = if formula.starts_with('=') {
            formula
        } else {
            format!("={formula}")
        };
        Self { address, formula }
    }
}

/// Anything that can list sheets and hand out their formula cells.
///
/// Implementors return sheets in workbook order and formula cells in
/// row-major order.
pub trait FormulaSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Formula cells of `sheet`, row by row.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet does not exist or cannot be read.
    fn formulas(&mut self, sheet: &str) -> Result<Vec<FormulaCell>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adds_missing_equals() {
        let address = CellAddress::parse("A1").expect("valid");
        assert_eq!(FormulaCell::new(address, "B1+1").formula, "=B1+1");
        assert_eq!(FormulaCell::new(address, "=B1+1").formula, "=B1+1");
    }
}
