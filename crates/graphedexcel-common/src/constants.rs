//! Workbook limits and output defaults.

/// Highest column number in an `.xlsx` sheet (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;

/// Highest row number in an `.xlsx` sheet.
pub const MAX_ROW: u32 = 1_048_576;

/// Maximum number of letters in a column name.
pub const MAX_COLUMN_LETTERS: usize = 3;

/// Workbook analysed when no path is given.
pub const DEFAULT_WORKBOOK: &str = "Book1.xlsx";

/// Directory rendered images are written to.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Number of nodes listed in the "highest degree" summary section.
pub const TOP_NODE_COUNT: usize = 10;

/// Width names are left-justified to in the text summary.
pub const LABEL_PAD: usize = 28;

/// Width counts are right-justified to in the text summary.
pub const COUNT_PAD: usize = 5;

/// Ranges with more cells than this are not expanded into member edges.
pub const DEFAULT_MAX_RANGE_CELLS: u64 = 10_000;

/// Iterations of the spring layout.
pub const LAYOUT_ITERATIONS: usize = 50;

/// Seed used for the spring layout when none is given.
pub const DEFAULT_LAYOUT_SEED: u64 = 42;

/// Function name prefixes Excel stores for newer functions.
pub const FUNCTION_PREFIXES: [&str; 2] = ["_xlfn.", "_xlws."];

/// Binary name for the CLI.
pub const BIN_NAME: &str = "graphedexcel";
