//! Cell and range references found in formulas.

use std::fmt;

use graphedexcel_common::error::Result;
use graphedexcel_common::types::{CellAddress, CellRef, RefTarget};

use crate::lexer::{self, Token};

/// A reference as written in a formula, before it is tied to a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawReference {
    /// Explicit sheet name, unquoted. `None` means the formula's own sheet.
    pub sheet: Option<String>,
    /// First cell of the reference.
    pub start: CellAddress,
    /// Second corner when the reference is a range.
    pub end: Option<CellAddress>,
}

impl RawReference {
    /// The referenced cell or (normalised) range.
    #[must_use]
    pub fn target(&self) -> RefTarget {
        match self.end {
            Some(end) => RefTarget::range(self.start, end),
            None => RefTarget::Cell(self.start),
        }
    }

    /// Ties the reference to a sheet, using `current_sheet` when the formula
    /// did not name one.
    #[must_use]
    pub fn qualify(&self, current_sheet: &str) -> CellRef {
        CellRef {
            sheet: self
                .sheet
                .clone()
                .unwrap_or_else(|| current_sheet.to_string()),
            target: self.target(),
        }
    }
}

fn needs_quotes(sheet: &str) -> bool {
    sheet.is_empty()
        || !sheet
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.'))
}

/// Formats the reference the way it would appear in a formula.
impl fmt::Display for RawReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) if needs_quotes(sheet) => write!(f, "'{}'!", sheet.replace('\'', "''"))?,
            Some(sheet) => write!(f, "{sheet}!")?,
            None => {}
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = self.end {
            write!(f, ":{end}")?;
        }
        Ok(())
    }
}

/// Extracts every reference in `formula`, in order of appearance.
///
/// Duplicates are kept; callers that build a graph deduplicate per formula.
/// References inside string literals are not reported, and whole-row or
/// whole-column ranges such as `A:A` are not references.
///
/// # Errors
///
/// Returns an error if the formula cannot be tokenized.
pub fn extract_references(formula: &str) -> Result<Vec<RawReference>> {
    let tokens = lexer::tokenize(formula)?;
    Ok(tokens
        .into_iter()
        .filter_map(|token| match token {
            Token::Reference(reference) => Some(reference),
            _ => None,
        })
        .collect())
}
