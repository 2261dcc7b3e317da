//! Reads workbooks produced with `rust_xlsxwriter` back through
//! [`XlsxWorkbook`].

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use graphedexcel_common::error::GraphedExcelError;
use graphedexcel_workbook::{FormulaSource, XlsxWorkbook};
use rust_xlsxwriter::Workbook;

fn write_budget_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("budget.xlsx");
    let mut workbook = Workbook::new();

    let inputs = workbook.add_worksheet();
    inputs.set_name("Inputs").expect("sheet name");
    inputs.write_number(0, 0, 100).expect("write");
    inputs.write_number(1, 0, 250).expect("write");
    inputs.write_formula(2, 0, "=SUM(A1:A2)").expect("write");
    inputs.write_string(0, 1, "label").expect("write");

    let report = workbook.add_worksheet();
    report.set_name("Report").expect("sheet name");
    report.write_formula(3, 2, "=Inputs!A3*2").expect("write");
    report.write_formula(0, 1, "=C4+1").expect("write");

    let _ = workbook.add_worksheet().set_name("Empty").expect("sheet name");

    workbook.save(&path).expect("save workbook");
    path
}

#[test]
fn lists_sheets_in_workbook_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_budget_workbook(dir.path());

    let workbook = XlsxWorkbook::open(&path).expect("open");
    assert_eq!(workbook.sheet_names(), vec!["Inputs", "Report", "Empty"]);
    assert_eq!(workbook.path(), path.as_path());
}

#[test]
fn reads_only_formula_cells_with_equals_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut workbook = XlsxWorkbook::open(write_budget_workbook(dir.path())).expect("open");

    let cells = workbook.formulas("Inputs").expect("read sheet");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].address.to_string(), "A3");
    assert_eq!(cells[0].formula, "=SUM(A1:A2)");
}

#[test]
fn formula_cells_are_row_major() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut workbook = XlsxWorkbook::open(write_budget_workbook(dir.path())).expect("open");

    let cells = workbook.formulas("Report").expect("read sheet");
    let addresses: Vec<String> = cells.iter().map(|c| c.address.to_string()).collect();
    assert_eq!(addresses, vec!["B1", "C4"]);
    assert_eq!(cells[1].formula, "=Inputs!A3*2");
}

#[test]
fn sheet_without_formulas_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut workbook = XlsxWorkbook::open(write_budget_workbook(dir.path())).expect("open");

    assert!(workbook.formulas("Empty").expect("read sheet").is_empty());
}

#[test]
fn unknown_sheet_is_a_workbook_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut workbook = XlsxWorkbook::open(write_budget_workbook(dir.path())).expect("open");

    let err = workbook.formulas("Nope").expect_err("missing sheet");
    assert!(matches!(err, GraphedExcelError::Workbook { .. }), "got: {err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = XlsxWorkbook::open("/nonexistent/Book1.xlsx").expect_err("missing file");
    assert!(matches!(err, GraphedExcelError::Io { .. }), "got: {err}");
}

#[test]
fn corrupt_file_is_a_workbook_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"this is not a zip archive").expect("write");

    let err = XlsxWorkbook::open(&path).expect_err("corrupt file");
    assert!(matches!(err, GraphedExcelError::Workbook { .. }), "got: {err}");
}
