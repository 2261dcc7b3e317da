//! Render style configuration.
//!
//! Every field has a default, so a style file only needs the keys it
//! overrides. Files ending in `.yaml`/`.yml` are read as YAML, anything else
//! as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphedExcelError, Result};

/// Styling applied when the dependency graph is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Title drawn at the top of the image.
    pub title: String,
    /// Fill colour of node markers.
    pub node_color: String,
    /// Stroke colour of edges.
    pub edge_color: String,
    /// Node marker area in square pixels.
    pub node_size: f64,
    /// Edge stroke width.
    pub edge_width: f64,
    /// Opacity of nodes and edges, `0.0..=1.0`.
    pub alpha: f64,
    /// Label font size in pixels.
    pub font_size: f64,
    /// Whether node labels are drawn.
    pub with_labels: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: "Excel Cell Dependency Graph".into(),
            node_color: "black".into(),
            edge_color: "gray".into(),
            node_size: 20.0,
            edge_width: 1.0,
            alpha: 0.8,
            font_size: 10.0,
            with_labels: true,
        }
    }
}

impl VisualConfig {
    /// Loads a style file, JSON or YAML depending on its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GraphedExcelError::io(path, e))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let config: Self = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| GraphedExcelError::Config {
                message: format!("{}: {e}", path.display()),
            })?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded render style");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(GraphedExcelError::Config {
                message: message.to_string(),
            })
        };
        if self.width == 0 || self.height == 0 {
            return invalid("width and height must be positive");
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return invalid("alpha must be between 0 and 1");
        }
        if self.node_size < 0.0 || self.edge_width < 0.0 || self.font_size < 0.0 {
            return invalid("sizes must not be negative");
        }
        Ok(())
    }

    /// Radius in pixels of a node marker with the configured area.
    #[must_use]
    pub fn node_radius(&self) -> f64 {
        (self.node_size / std::f64::consts::PI).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn defaults_describe_plain_plot() {
        let config = VisualConfig::default();
        assert_eq!(config.node_color, "black");
        assert_eq!(config.edge_color, "gray");
        assert!((config.alpha - 0.8).abs() < f64::EPSILON);
        assert_eq!((config.width, config.height), (1000, 1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_partial_json() {
        let file = write_file(".json", r#"{ "node_color": "red", "width": 400 }"#);
        let config = VisualConfig::load(file.path()).expect("should load");
        assert_eq!(config.node_color, "red");
        assert_eq!(config.width, 400);
        assert_eq!(config.edge_color, "gray");
    }

    #[test]
    fn load_yaml_by_extension() {
        let file = write_file(".yaml", "edge_color: blue\nwith_labels: false\n");
        let config = VisualConfig::load(file.path()).expect("should load");
        assert_eq!(config.edge_color, "blue");
        assert!(!config.with_labels);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_file(".json", r#"{ "colour": "red" }"#);
        assert!(VisualConfig::load(file.path()).is_err());
    }

    #[test]
    fn out_of_range_alpha_is_rejected() {
        let file = write_file(".json", r#"{ "alpha": 1.5 }"#);
        let err = VisualConfig::load(file.path()).expect_err("should reject");
        assert!(err.to_string().contains("alpha"), "got: {err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = VisualConfig::load(Path::new("/nonexistent/style.json")).expect_err("missing");
        assert!(matches!(err, GraphedExcelError::Io { .. }));
    }
}
