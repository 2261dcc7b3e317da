//! Image output of the dependency graph: SVG drawings and Graphviz DOT.

use std::fmt::Write as _;
use std::path::Path;

use graphedexcel_common::config::VisualConfig;
use graphedexcel_common::error::{GraphedExcelError, Result};

use crate::graph::DependencyGraph;
use crate::layout::{Point, SpringParams, spring_layout};

const MARGIN: f64 = 40.0;
const TITLE_HEIGHT: f64 = 40.0;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Scalable vector graphics with a spring layout.
    Svg,
    /// Graphviz source, laid out by the viewer.
    Dot,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
        }
    }
}

/// Options shared by the renderers.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Draw edges with arrowheads instead of as undirected lines.
    pub keep_direction: bool,
    /// Layout tuning for SVG output.
    pub layout: SpringParams,
    /// Colours, sizes, and title.
    pub style: VisualConfig,
}

/// Renders `graph` in the requested format.
#[must_use]
pub fn render(graph: &DependencyGraph, format: ImageFormat, options: &RenderOptions) -> String {
    match format {
        ImageFormat::Svg => render_svg(graph, options),
        ImageFormat::Dot => render_dot(graph, options.keep_direction),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Maps layout space `[-1, 1]²` onto the drawing area, y pointing down.
fn to_canvas(p: Point, width: f64, height: f64) -> Point {
    let usable_w = 2.0f64.mul_add(-MARGIN, width).max(1.0);
    let usable_h = 2.0f64.mul_add(-MARGIN, height - TITLE_HEIGHT).max(1.0);
    Point {
        x: MARGIN + (p.x + 1.0) / 2.0 * usable_w,
        y: TITLE_HEIGHT + MARGIN + (1.0 - p.y) / 2.0 * usable_h,
    }
}

/// Draws the graph as SVG using a spring layout.
///
/// Without `keep_direction` a pair of mutual dependencies is drawn as one
/// line; with it, every edge is drawn and ends in an arrowhead at the
/// referenced cell. Self-loops are not drawn.
#[must_use]
pub fn render_svg(graph: &DependencyGraph, options: &RenderOptions) -> String {
    let style = &options.style;
    let width = f64::from(style.width);
    let height = f64::from(style.height);
    let radius = style.node_radius();

    let layout_edges = graph.undirected_edges();
    let positions: Vec<Point> = spring_layout(graph.node_count(), &layout_edges, options.layout)
        .into_iter()
        .map(|p| to_canvas(p, width, height))
        .collect();
    let drawn_edges = if options.keep_direction {
        graph.edge_positions()
    } else {
        layout_edges
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = style.width,
        h = style.height
    );
    let title = escape_xml(&style.title);
    let _ = writeln!(svg, "<title>{title}</title>");
    if options.keep_direction {
        let _ = writeln!(
            svg,
            r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker></defs>"#,
            escape_xml(&style.edge_color)
        );
    }
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="16">{title}</text>"#,
        width / 2.0,
        TITLE_HEIGHT * 0.6
    );

    let marker = if options.keep_direction {
        r#" marker-end="url(#arrow)""#
    } else {
        ""
    };
    let _ = writeln!(
        svg,
        r#"<g stroke="{}" stroke-width="{}" stroke-opacity="{}">"#,
        escape_xml(&style.edge_color),
        style.edge_width,
        style.alpha
    );
    for (from, to) in drawn_edges {
        if from == to {
            continue;
        }
        let (a, b) = (positions[from], positions[to]);
        let length = (b.x - a.x).hypot(b.y - a.y);
        // stop at the marker's rim so arrowheads stay visible
        let end = if options.keep_direction && length > radius {
            let shrink = (length - radius) / length;
            Point {
                x: (b.x - a.x).mul_add(shrink, a.x),
                y: (b.y - a.y).mul_add(shrink, a.y),
            }
        } else {
            b
        };
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{marker}/>"#,
            a.x, a.y, end.x, end.y
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(
        svg,
        r#"<g fill="{}" fill-opacity="{}">"#,
        escape_xml(&style.node_color),
        style.alpha
    );
    for p in &positions {
        let _ = writeln!(svg, r#"<circle cx="{:.2}" cy="{:.2}" r="{radius:.2}"/>"#, p.x, p.y);
    }
    let _ = writeln!(svg, "</g>");

    if style.with_labels {
        let _ = writeln!(
            svg,
            r#"<g font-family="sans-serif" font-size="{}" text-anchor="middle">"#,
            style.font_size
        );
        for (node, p) in graph.nodes().zip(&positions) {
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
                p.x,
                p.y - radius - 2.0,
                escape_xml(&node.name)
            );
        }
        let _ = writeln!(svg, "</g>");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes the graph as Graphviz source. Nodes without edges do not occur,
/// so only edges are listed after the node declarations.
#[must_use]
pub fn render_dot(graph: &DependencyGraph, keep_direction: bool) -> String {
    let (keyword, arrow) = if keep_direction {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };
    let names: Vec<String> = graph.nodes().map(|n| escape_dot(&n.name)).collect();
    let edges = if keep_direction {
        graph.edge_positions()
    } else {
        graph.undirected_edges()
    };

    let mut dot = String::new();
    let _ = writeln!(dot, "{keyword} dependencies {{");
    for name in &names {
        let _ = writeln!(dot, "    \"{name}\";");
    }
    for (from, to) in edges {
        let _ = writeln!(dot, "    \"{}\" {arrow} \"{}\";", names[from], names[to]);
    }
    dot.push_str("}\n");
    dot
}

/// Writes `contents` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_image(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GraphedExcelError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| GraphedExcelError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote graph image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use graphedexcel_common::types::CellRef;

    use super::*;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (a, b) in edges {
            let _ = graph.add_dependency(
                &CellRef::parse(a).expect("valid"),
                &CellRef::parse(b).expect("valid"),
            );
        }
        graph
    }

    #[test]
    fn dot_undirected_collapses_mutual_edges() {
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!A1")]);
        let dot = render_dot(&g, false);
        assert!(dot.starts_with("graph dependencies {\n"));
        assert_eq!(dot.matches(" -- ").count(), 1);
        assert!(dot.contains("    \"S!A1\" -- \"S!B1\";\n"));
    }

    #[test]
    fn dot_directed_keeps_every_edge() {
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!A1")]);
        let dot = render_dot(&g, true);
        assert!(dot.starts_with("digraph dependencies {\n"));
        assert_eq!(dot.matches(" -> ").count(), 2);
    }

    #[test]
    fn dot_escapes_quotes() {
        let g = graph(&[("'Say \"hi\"'!A1", "S!B1")]);
        assert!(render_dot(&g, true).contains(r#""Say \"hi\"!A1""#));
    }

    #[test]
    fn svg_has_one_circle_per_node() {
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!C1")]);
        let svg = render_svg(&g, &RenderOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle ").count(), 3);
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.contains("Excel Cell Dependency Graph"));
        assert!(!svg.contains("marker-end"));
    }

    #[test]
    fn svg_directed_uses_arrowheads() {
        let g = graph(&[("S!A1", "S!B1"), ("S!B1", "S!A1")]);
        let options = RenderOptions {
            keep_direction: true,
            ..RenderOptions::default()
        };
        let svg = render_svg(&g, &options);
        assert_eq!(svg.matches("marker-end=\"url(#arrow)\"").count(), 2);

        let undirected = render_svg(&g, &RenderOptions::default());
        assert_eq!(undirected.matches("<line ").count(), 1);
    }

    #[test]
    fn svg_labels_are_escaped_and_optional() {
        let g = graph(&[("'R&D'!A1", "'R&D'!B1")]);
        let svg = render_svg(&g, &RenderOptions::default());
        assert!(svg.contains("R&amp;D!A1"));
        assert!(!svg.contains("R&D!A1"));

        let mut options = RenderOptions::default();
        options.style.with_labels = false;
        let svg = render_svg(&g, &options);
        assert!(!svg.contains("R&amp;D"));
    }

    #[test]
    fn svg_is_deterministic() {
        let g = graph(&[("S!A1", "S!B1"), ("S!C1", "S!B1")]);
        let options = RenderOptions::default();
        assert_eq!(render_svg(&g, &options), render_svg(&g, &options));
    }

    #[test]
    fn render_dispatches_on_format() {
        let g = graph(&[("S!A1", "S!B1")]);
        let options = RenderOptions::default();
        assert!(render(&g, ImageFormat::Dot, &options).starts_with("graph "));
        assert!(render(&g, ImageFormat::Svg, &options).starts_with("<svg "));
        assert_eq!(ImageFormat::Svg.extension(), "svg");
    }

    #[test]
    fn write_image_creates_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("images").join("Book1.xlsx.svg");
        write_image(&path, "<svg/>").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "<svg/>");
    }
}
