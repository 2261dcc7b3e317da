//! Workbook files read with `calamine`.
//!
//! `calamine` detects the format from the file extension, so `.xlsx`,
//! `.xlsm`, `.xlsb` and `.ods` files are all accepted. Shared formulas are
//! expanded by the reader, so every cell reports its own formula text.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Reader, Sheets, open_workbook_auto};
use graphedexcel_common::error::{GraphedExcelError, Result};
use graphedexcel_common::types::CellAddress;

use crate::source::{FormulaCell, FormulaSource};

/// A workbook opened from disk.
pub struct XlsxWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl XlsxWorkbook {
    /// Opens the workbook at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file does not exist, or a workbook error
    /// if it is not a readable spreadsheet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(GraphedExcelError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "workbook file not found"),
            ));
        }
        let sheets = open_workbook_auto(&path).map_err(|e| GraphedExcelError::Workbook {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "opened workbook");
        Ok(Self { path, sheets })
    }

    /// Path the workbook was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn workbook_error(&self, message: impl Into<String>) -> GraphedExcelError {
        GraphedExcelError::Workbook {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

impl FormulaSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn formulas(&mut self, sheet: &str) -> Result<Vec<FormulaCell>> {
        let range = self
            .sheets
            .worksheet_formula(sheet)
            .map_err(|e| self.workbook_error(format!("sheet \"{sheet}\": {e}")))?;
        let Some((first_row, first_column)) = range.start() else {
            tracing::debug!(sheet, "sheet has no formulas");
            return Ok(Vec::new());
        };

        let mut cells = Vec::new();
        for (row, column, formula) in range.used_cells() {
            let (Ok(row), Ok(column)) = (u32::try_from(row), u32::try_from(column)) else {
                return Err(self.workbook_error(format!("sheet \"{sheet}\" is too large")));
            };
            let address = CellAddress::from_zero_based(first_row + row, first_column + column)?;
            if formula.trim().is_empty() {
                continue;
            }
            cells.push(FormulaCell::new(address, formula.as_str()));
        }
        tracing::debug!(sheet, count = cells.len(), "read formula cells");
        Ok(cells)
    }
}
