//! Domain primitive types: cell addresses and sheet-qualified references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_COLUMN, MAX_COLUMN_LETTERS, MAX_ROW};
use crate::error::{GraphedExcelError, Result};

/// A single cell position, 1-based in both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    /// Column number (`A` = 1).
    pub column: u32,
    /// Row number (first row = 1).
    pub row: u32,
}

impl CellAddress {
    /// Creates an address from 1-based column and row numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is outside the sheet limits.
    pub fn new(column: u32, row: u32) -> Result<Self> {
        if column == 0 || column > MAX_COLUMN || row == 0 || row > MAX_ROW {
            return Err(GraphedExcelError::InvalidAddress {
                input: format!("column {column}, row {row}"),
            });
        }
        Ok(Self { column, row })
    }

    /// Creates an address from 0-based `(row, column)` indices as used by
    /// spreadsheet readers.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the sheet limits.
    pub fn from_zero_based(row: u32, column: u32) -> Result<Self> {
        Self::new(column.saturating_add(1), row.saturating_add(1))
    }

    /// Parses an `A1`-style address. `$` anchors are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid address.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || GraphedExcelError::InvalidAddress {
            input: input.to_string(),
        };
        let rest = input.strip_prefix('$').unwrap_or(input);
        let letters_end = rest
            .find(|c: char| !c.is_ascii_uppercase())
            .ok_or_else(invalid)?;
        let (letters, rest) = rest.split_at(letters_end);
        let digits = rest.strip_prefix('$').unwrap_or(rest);
        if letters.is_empty()
            || letters.len() > MAX_COLUMN_LETTERS
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let column = column_number(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(column, row).map_err(|_| invalid())
    }

    /// Returns the column letters (`1` -> `A`, `27` -> `AA`).
    #[must_use]
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = GraphedExcelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Converts column letters to a 1-based column number.
///
/// Returns `None` for empty input, non-uppercase characters, or overflow.
#[must_use]
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0u32, |acc, b| {
        if !b.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(u32::from(b - b'A') + 1)
    })
}

/// Converts a 1-based column number to its letters.
#[must_use]
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = u8::try_from((column - 1) % 26).unwrap_or_default();
        letters.push(b'A' + rem);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// What a reference points at: one cell or a rectangular range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefTarget {
    /// A single cell.
    Cell(CellAddress),
    /// A rectangular range, stored top-left to bottom-right.
    Range {
        /// Top-left corner.
        start: CellAddress,
        /// Bottom-right corner.
        end: CellAddress,
    },
}

impl RefTarget {
    /// Builds a range target, normalising the corners so `start` is the
    /// top-left cell. A range whose corners coincide collapses to a cell.
    #[must_use]
    pub fn range(a: CellAddress, b: CellAddress) -> Self {
        let start = CellAddress {
            column: a.column.min(b.column),
            row: a.row.min(b.row),
        };
        let end = CellAddress {
            column: a.column.max(b.column),
            row: a.row.max(b.row),
        };
        if start == end {
            Self::Cell(start)
        } else {
            Self::Range { start, end }
        }
    }

    /// Returns `true` for range targets.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Number of cells covered by the target.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        match self {
            Self::Cell(_) => 1,
            Self::Range { start, end } => {
                u64::from(end.column - start.column + 1) * u64::from(end.row - start.row + 1)
            }
        }
    }

    /// Iterates the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> + '_ {
        let (start, end) = match *self {
            Self::Cell(cell) => (cell, cell),
            Self::Range { start, end } => (start, end),
        };
        (start.row..=end.row).flat_map(move |row| {
            (start.column..=end.column).map(move |column| CellAddress { column, row })
        })
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => write!(f, "{cell}"),
            Self::Range { start, end } => write!(f, "{start}:{end}"),
        }
    }
}

/// A reference qualified with the sheet it lives on.
///
/// The `Display` form (`Sheet1!A1`, `My Sheet!A1:B3`) is the identity of a
/// node in the dependency graph. Sheet names are shown unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Sheet name.
    pub sheet: String,
    /// Referenced cell or range.
    pub target: RefTarget,
}

impl CellRef {
    /// Creates a reference to a single cell.
    pub fn cell(sheet: impl Into<String>, address: CellAddress) -> Self {
        Self {
            sheet: sheet.into(),
            target: RefTarget::Cell(address),
        }
    }

    /// Parses `Sheet!A1` or `Sheet!A1:B2`. Surrounding single quotes on the
    /// sheet name are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet separator is missing or an address is
    /// invalid.
    pub fn parse(input: &str) -> Result<Self> {
        let (sheet, target) = input
            .rsplit_once('!')
            .ok_or_else(|| GraphedExcelError::InvalidAddress {
                input: input.to_string(),
            })?;
        let sheet = sheet
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .map_or_else(|| sheet.to_string(), |s| s.replace("''", "'"));
        let target = match target.split_once(':') {
            Some((a, b)) => RefTarget::range(CellAddress::parse(a)?, CellAddress::parse(b)?),
            None => RefTarget::Cell(CellAddress::parse(target)?),
        };
        Ok(Self { sheet, target })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.target)
    }
}
