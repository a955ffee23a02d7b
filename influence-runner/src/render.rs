//! SVG rendering of the influence graph.
//!
//! Layout coordinates in [-1, 1] are mapped onto the canvas with a margin.
//! Node area follows PageRank (`pagerank * node_size_scale`, in square
//! points); the highest-ranked nodes are drawn green, the rest sky blue.

use std::fmt::Write as _;

use influence_core::config::PresentationConfig;
use influence_core::{InfluenceGraph, InfluenceRanking, Layout};

const MARGIN: f64 = 60.0;
const TITLE_HEIGHT: f64 = 40.0;
/// Pixels per typographic point at 100 dpi.
const PX_PER_PT: f64 = 100.0 / 72.0;

const EDGE_COLOR: &str = "gray";
const HIGHLIGHT_COLOR: &str = "green";
const NODE_COLOR: &str = "skyblue";

/// Radius in pixels of a node whose marker area is `size` square points.
pub fn node_radius(size: f64) -> f64 {
    size.max(0.0).sqrt() / 2.0 * PX_PER_PT
}

/// Draw the graph as a standalone SVG document.
///
/// `layout` must have one position per graph node.
pub fn render_svg(
    graph: &InfluenceGraph,
    ranking: &InfluenceRanking,
    layout: &Layout,
    config: &PresentationConfig,
) -> String {
    let width = config.width as f64;
    let height = config.height as f64;
    let highlighted = ranking.top_symbols(config.highlight_top);

    let plot_w = (width - 2.0 * MARGIN).max(1.0);
    let plot_h = (height - 2.0 * MARGIN - TITLE_HEIGHT).max(1.0);
    let to_canvas = |p: [f64; 2]| {
        (
            MARGIN + (p[0] + 1.0) / 2.0 * plot_w,
            // SVG y grows downward
            MARGIN + TITLE_HEIGHT + (1.0 - (p[1] + 1.0) / 2.0) * plot_h,
        )
    };
    let points: Vec<(f64, f64)> = layout.positions.iter().map(|&p| to_canvas(p)).collect();

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = config.height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
        width / 2.0,
        MARGIN / 2.0 + TITLE_HEIGHT / 2.0,
        escape(&config.title)
    );

    let _ = writeln!(
        svg,
        r#"<g stroke="{EDGE_COLOR}" stroke-opacity="0.3" stroke-width="0.5">"#
    );
    for (i, j, _) in graph.edges() {
        if let (Some(a), Some(b)) = (points.get(i), points.get(j)) {
            let _ = writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                a.0, a.1, b.0, b.1
            );
        }
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(svg, "<g>");
    for (i, &(x, y)) in points.iter().enumerate().take(graph.node_count()) {
        let symbol = graph.symbol(i);
        let pagerank = ranking.get(symbol).map(|r| r.pagerank).unwrap_or(0.0);
        let fill = if highlighted.contains(&symbol) {
            HIGHLIGHT_COLOR
        } else {
            NODE_COLOR
        };
        let _ = writeln!(
            svg,
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="{:.2}" fill="{fill}"><title>{} ({pagerank:.4})</title></circle>"#,
            node_radius(pagerank * config.node_size_scale),
            escape(symbol)
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(
        svg,
        r#"<g font-family="sans-serif" font-size="8" text-anchor="middle" dominant-baseline="central">"#
    );
    for (i, &(x, y)) in points.iter().enumerate().take(graph.node_count()) {
        let _ = writeln!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}">{}</text>"#,
            escape(graph.symbol(i))
        );
    }
    let _ = writeln!(svg, "</g>");
    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
