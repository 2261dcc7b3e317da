//! Terminal styling and output path helpers for CLI commands.

use std::path::{Path, PathBuf};

/// ANSI escape that starts bold text.
pub const BOLD: &str = "\x1b[1m";
/// ANSI escape that starts dimmed text.
pub const DIM: &str = "\x1b[2m";
/// ANSI escape that resets all text attributes.
pub const RESET: &str = "\x1b[0m";

/// Where the image of `workbook` goes: `<dir>/<workbook file name>.<ext>`,
/// e.g. `images/Book1.xlsx.svg`.
#[must_use]
pub fn image_path(dir: &Path, workbook: &Path, extension: &str) -> PathBuf {
    let stem = workbook
        .file_name()
        .map_or_else(|| "workbook".into(), |name| name.to_string_lossy().into_owned());
    dir.join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_path_keeps_workbook_name() {
        let path = image_path(Path::new("images"), Path::new("Book1.xlsx"), "svg");
        assert_eq!(path, PathBuf::from("images/Book1.xlsx.svg"));
    }

    #[test]
    fn image_path_drops_workbook_directories() {
        let path = image_path(Path::new("out"), Path::new("data/q1/model.xlsx"), "dot");
        assert_eq!(path, PathBuf::from("out/model.xlsx.dot"));
    }

    #[test]
    fn image_path_without_file_name() {
        let path = image_path(Path::new("out"), Path::new("/"), "svg");
        assert_eq!(path, PathBuf::from("out/workbook.svg"));
    }
}
