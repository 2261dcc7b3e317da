//! Workbooks assembled in memory.

use graphedexcel_common::error::{GraphedExcelError, Result};
use graphedexcel_common::types::CellAddress;

use crate::source::{FormulaCell, FormulaSource};

/// A workbook built from `(address, formula)` pairs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, Vec<FormulaCell>)>,
}

impl InMemoryWorkbook {
    /// Creates a workbook without sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet. Cells may be given in any order; they are stored
    /// row by row.
    ///
    /// # Errors
    ///
    /// Returns an error if an address does not parse or the sheet name is
    /// already taken.
    pub fn with_sheet<'a>(
        mut self,
        name: impl Into<String>,
        cells: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let name = name.into();
        if self.sheets.iter().any(|(existing, _)| *existing == name) {
            return Err(GraphedExcelError::Config {
                message: format!("duplicate sheet name: \"{name}\""),
            });
        }
        let mut formulas = cells
            .into_iter()
            .map(|(address, formula)| Ok(FormulaCell::new(CellAddress::parse(address)?, formula)))
            .collect::<Result<Vec<_>>>()?;
        formulas.sort_by_key(|cell| (cell.address.row, cell.address.column));
        self.sheets.push((name, formulas));
        Ok(self)
    }
}

impl FormulaSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn formulas(&mut self, sheet: &str) -> Result<Vec<FormulaCell>> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, cells)| cells.clone())
            .ok_or_else(|| GraphedExcelError::Config {
                message: format!("sheet not found: \"{sheet}\""),
            })
    }
}
