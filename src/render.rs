use crate::analytics::{AnalyticsTab, ChartLayout, compute_chart_layout};
use crate::config::{Config, RenderConfig};
use crate::layout::{PositionedKind, PositionedNode};
use crate::surface::DiagramSurface;
use crate::theme::Theme;
use crate::view::ViewState;
use anyhow::Result;
use std::path::Path;

const TAB_WIDTH: f32 = 88.0;
const TAB_HEIGHT: f32 = 32.0;
const PAGE_GAP: f32 = 24.0;
const HEADER_HEIGHT: f32 = 56.0;

pub fn render_diagram_svg(surface: &DiagramSurface, theme: &Theme) -> String {
    let width = surface.width.max(1.0);
    let height = surface.height.max(1.0);
    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&diagram_body(surface, theme));
    svg.push_str("</svg>");
    svg
}

fn diagram_body(surface: &DiagramSurface, theme: &Theme) -> String {
    let mut svg = String::new();
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    for node in surface.visible_nodes().filter(|n| n.kind == PositionedKind::Container) {
        svg.push_str(&container_svg(node, theme));
    }

    for edge in &surface.edges {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
            points_to_path(&edge.points),
            theme.line_color
        ));
        if let Some(label) = &edge.label {
            let (x, y) = midpoint(&edge.points);
            svg.push_str(&text_svg(x, y - 4.0, label, theme, theme.font_size * 0.85, "middle"));
        }
    }

    for node in surface.visible_nodes() {
        match node.kind {
            PositionedKind::Container => {}
            PositionedKind::Stage => {
                svg.push_str(&format!(
                    "<rect data-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    escape_xml(&node.id),
                    node.x,
                    node.y,
                    node.width,
                    node.height,
                    node.style.fill,
                    node.style.stroke,
                    node.style.stroke_width,
                    r = node.style.corner_radius,
                ));
                let (cx, cy) = node.center();
                svg.push_str(&text_svg(
                    cx,
                    cy + theme.font_size / 3.0,
                    &node.label,
                    theme,
                    theme.font_size,
                    "middle"),
                );
            }
            PositionedKind::Circular => {
                let (cx, cy) = node.center();
                svg.push_str(&format!(
                    "<circle data-id=\"{}\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    escape_xml(&node.id),
                    node.width / 2.0,
                    node.style.fill,
                    node.style.stroke,
                    node.style.stroke_width,
                ));
                // Circles are too small for their labels; place them underneath.
                let label_y = node.y + node.height + theme.font_size + 4.0;
                svg.push_str(&text_svg(
                    cx,
                    label_y,
                    &node.label,
                    theme,
                    theme.font_size * 0.9,
                    "middle"),
                );
            }
        }
    }
    svg
}

fn container_svg(node: &PositionedNode, theme: &Theme) -> String {
    let mut svg = format!(
        "<rect data-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        escape_xml(&node.id),
        node.x,
        node.y,
        node.width,
        node.height,
        node.style.fill,
        node.style.stroke,
        node.style.stroke_width,
        r = node.style.corner_radius,
    );
    let marker = if node.expanded.unwrap_or(true) {
        "\u{25BE}"
    } else {
        "\u{25B8}"
    };
    svg.push_str(&text_svg(
        node.x + 16.0,
        node.y + 32.0,
        &format!("{marker} {}", node.label),
        theme,
        theme.font_size * 1.15,
        "start",
    ));
    svg
}

pub fn render_chart_svg(chart: &ChartLayout, theme: &Theme) -> String {
    let mut svg = svg_open(chart.width, chart.height);
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&chart_body(chart, theme));
    svg.push_str("</svg>");
    svg
}

fn chart_body(chart: &ChartLayout, theme: &Theme) -> String {
    let mut svg = String::new();

    if let Some(pie) = &chart.pie {
        let (cx, cy) = pie.center;
        if let [only] = pie.slices.as_slice() {
            svg.push_str(&format!(
                "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
                pie.radius, only.color
            ));
        } else {
            for slice in &pie.slices {
                svg.push_str(&format!(
                    "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
                    arc_path(cx, cy, pie.radius, slice.start_angle, slice.end_angle),
                    slice.color,
                    theme.background
                ));
            }
        }
        if pie.slices.is_empty() {
            svg.push_str(&text_svg(cx, cy, "No data", theme, theme.font_size, "middle"));
        }
    } else {
        for (label, y) in &chart.y_ticks {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
                chart.plot_x,
                chart.plot_x + chart.plot_width,
                theme.grid_color
            ));
            svg.push_str(&text_svg(
                chart.plot_x - 8.0,
                y + 4.0,
                label,
                theme,
                theme.font_size * 0.85,
                "end"),
            );
        }
        let axis_y = chart.plot_y + chart.plot_height;
        for (label, x) in &chart.categories {
            svg.push_str(&text_svg(
                *x,
                axis_y + 20.0,
                label,
                theme,
                theme.font_size * 0.85,
                "middle"),
            );
        }
        for bar in &chart.bars {
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"3\" fill=\"{}\"/>",
                bar.x, bar.y, bar.width, bar.height, bar.color
            ));
        }
        for series in &chart.series {
            if series.filled {
                if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
                    let mut closed = series.points.clone();
                    closed.push((last.0, axis_y));
                    closed.push((first.0, axis_y));
                    svg.push_str(&format!(
                        "<path d=\"{} Z\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\"/>",
                        points_to_path(&closed),
                        series.color,
                        chart.area_opacity
                    ));
                }
            }
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                points_to_path(&series.points),
                series.color,
                chart.line_width
            ));
            for (x, y) in &series.points {
                svg.push_str(&format!(
                    "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"3\" fill=\"{}\"/>",
                    series.color
                ));
            }
        }
    }

    for item in &chart.legend {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"12\" height=\"12\" rx=\"2\" fill=\"{}\"/>",
            item.x,
            item.y - 10.0,
            item.color
        ));
        svg.push_str(&text_svg(
            item.x + 18.0,
            item.y,
            &item.label,
            theme,
            theme.font_size * 0.85,
            "start"),
        );
    }
    svg
}

fn arc_path(cx: f32, cy: f32, r: f32, start: f32, end: f32) -> String {
    // Angles run clockwise from twelve o'clock.
    let point = |angle: f32| (cx + r * angle.sin(), cy - r * angle.cos());
    let (sx, sy) = point(start);
    let (ex, ey) = point(end);
    let large_arc = if end - start > std::f32::consts::PI { 1 } else { 0 };
    format!("M {cx:.2} {cy:.2} L {sx:.2} {sy:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {ex:.2} {ey:.2} Z")
}

/// Header, diagram, tab strip and the active chart stacked vertically.
pub fn render_page_svg(state: &ViewState, config: &Config) -> String {
    let theme = &config.theme;
    let ViewState::Ready {
        workflow,
        surface,
        metrics,
        tab,
    } = state
    else {
        return render_not_found_svg(state, theme);
    };

    let chart = compute_chart_layout(metrics, *tab, &config.chart, theme);
    let width = surface.width.max(chart.width).max(TAB_WIDTH * 4.0);
    let diagram_y = HEADER_HEIGHT;
    let tabs_y = diagram_y + surface.height + PAGE_GAP;
    let chart_y = tabs_y + TAB_HEIGHT + 8.0;
    let height = chart_y + chart.height;

    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&text_svg(0.0, 24.0, &workflow.name, theme, theme.font_size * 1.4, "start"));
    if !workflow.description.is_empty() {
        svg.push_str(&text_svg(
            0.0,
            44.0,
            &workflow.description,
            theme,
            theme.font_size * 0.9,
            "start"),
        );
    }

    svg.push_str(&format!("<g transform=\"translate(0 {diagram_y:.2})\">"));
    svg.push_str(&diagram_body(surface, theme));
    svg.push_str("</g>");

    for (idx, candidate) in AnalyticsTab::ALL.iter().enumerate() {
        let x = idx as f32 * (TAB_WIDTH + 4.0);
        let active = candidate == tab;
        let fill = if active { &theme.tab_active_fill } else { &theme.tab_fill };
        let text_fill = if active { &theme.background } else { &theme.text_color };
        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{tabs_y:.2}\" width=\"{TAB_WIDTH}\" height=\"{TAB_HEIGHT}\" rx=\"6\" fill=\"{fill}\"/>"
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{text_fill}\">{}</text>",
            x + TAB_WIDTH / 2.0,
            tabs_y + TAB_HEIGHT / 2.0 + theme.font_size / 3.0,
            theme.font_family,
            theme.font_size,
            candidate.title()
        ));
    }

    svg.push_str(&format!("<g transform=\"translate(0 {chart_y:.2})\">"));
    svg.push_str(&chart_body(&chart, theme));
    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

pub fn render_not_found_svg(state: &ViewState, theme: &Theme) -> String {
    let message = match state {
        ViewState::NotFound { reason } => reason.to_string(),
        ViewState::Ready { .. } => String::new(),
    };
    let (width, height) = (640.0, 240.0);
    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&text_svg(width / 2.0, 80.0, "404", theme, theme.font_size * 3.0, "middle"));
    svg.push_str(&text_svg(width / 2.0, 120.0, &message, theme, theme.font_size, "middle"));
    svg.push_str(&format!(
        "<a href=\"/\"><rect x=\"{:.2}\" y=\"150\" width=\"200\" height=\"40\" rx=\"8\" fill=\"{}\"/>",
        width / 2.0 - 100.0,
        theme.tab_active_fill
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"175\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">Return to default view</text></a>",
        width / 2.0,
        theme.font_family,
        theme.font_size,
        theme.background
    ));
    svg.push_str("</svg>");
    svg
}

fn svg_open(width: f32, height: f32) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    )
}

fn text_svg(x: f32, y: f32, text: &str, theme: &Theme, font_size: f32, anchor: &str) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{font_size:.1}\" fill=\"{}\">{}</text>",
        theme.font_family,
        theme.text_color,
        escape_xml(text)
    )
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn midpoint(points: &[(f32, f32)]) -> (f32, f32) {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
        _ => (0.0, 0.0),
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
        255,
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::WorkflowMetrics;
    use crate::config::LayoutConfig;
    use crate::error::VizError;
    use crate::ir::{EdgeSpec, NodeSpec, WorkflowDescription};

    fn sample() -> WorkflowDescription {
        let mut wf = WorkflowDescription::new("wf", "Billing & Payments");
        wf.nodes.push(NodeSpec::event("invoice", "Invoice Sent"));
        wf.nodes.push(NodeSpec::status("unpaid", "Unpaid"));
        wf.edges.push(EdgeSpec::new("invoice", "unpaid"));
        wf
    }

    #[test]
    fn render_diagram_basic() {
        let surface = DiagramSurface::build(
            &sample(),
            true,
            &LayoutConfig::default(),
            &Theme::light(),
        );
        let svg = render_diagram_svg(&surface, &Theme::light());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Invoice Sent"));
        assert!(svg.contains("<circle data-id=\"unpaid\""));
        assert!(svg.contains("Billing &amp; Payments"));
        assert!(svg.contains("marker-end"));
    }

    #[test]
    fn collapsed_diagram_omits_children() {
        let surface = DiagramSurface::build(
            &sample(),
            false,
            &LayoutConfig::default(),
            &Theme::light(),
        );
        let svg = render_diagram_svg(&surface, &Theme::light());
        assert!(!svg.contains("Invoice Sent"));
        assert!(svg.contains("data-id=\"wf::container\""));
        assert!(svg.contains("\u{25B8} Billing"));
    }

    #[test]
    fn renders_every_chart_tab() {
        let metrics = WorkflowMetrics::from_workflow(&sample());
        let config = Config::default();
        for tab in AnalyticsTab::ALL {
            let chart = compute_chart_layout(&metrics, tab, &config.chart, &config.theme);
            let svg = render_chart_svg(&chart, &config.theme);
            assert!(svg.contains("</svg>"), "{tab:?}");
        }
        let area = compute_chart_layout(&metrics, AnalyticsTab::Area, &config.chart, &config.theme);
        assert!(render_chart_svg(&area, &config.theme).contains("fill-opacity"));
    }

    #[test]
    fn not_found_page_offers_recovery() {
        let state = ViewState::NotFound {
            reason: VizError::WorkflowNotFound("ghost".to_string()),
        };
        let svg = render_page_svg(&state, &Config::default());
        assert!(svg.contains("Workflow not found: ghost"));
        assert!(svg.contains("Return to default view"));
    }

    #[test]
    fn arc_path_uses_large_arc_flag() {
        assert!(arc_path(0.0, 0.0, 10.0, 0.0, 4.0).contains(" 0 1 1 "));
        assert!(arc_path(0.0, 0.0, 10.0, 0.0, 1.0).contains(" 0 0 1 "));
    }
}
