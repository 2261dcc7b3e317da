//! # graphedexcel-workbook
//!
//! Sources of formula cells.
//!
//! - **Source**: the [`FormulaSource`] trait the graph builder consumes.
//! - **Xlsx**: workbook files on disk, read with `calamine`.
//! - **Memory**: sheets assembled in code, for tests and library callers.

pub mod memory;
pub mod source;
pub mod xlsx;

pub use memory::InMemoryWorkbook;
pub use source::{FormulaCell, FormulaSource};
pub use xlsx::XlsxWorkbook;
