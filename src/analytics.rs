use crate::config::ChartConfig;
use crate::error::VizError;
use crate::ir::{NodeKind, WorkflowDescription};
use crate::theme::Theme;
use serde::Serialize;
use std::f32::consts::PI;
use std::str::FromStr;

pub const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsTab {
    #[default]
    Bar,
    Line,
    Area,
    Pie,
}

impl AnalyticsTab {
    pub const ALL: [AnalyticsTab; 4] = [Self::Bar, Self::Line, Self::Area, Self::Pie];

    pub fn title(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Area => "Area",
            Self::Pie => "Pie",
        }
    }
}

impl FromStr for AnalyticsTab {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "pie" => Ok(Self::Pie),
            _ => Err(VizError::UnknownTab(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    pub month: &'static str,
    pub events: f32,
    pub statuses: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSlice {
    pub label: &'static str,
    pub value: f32,
}

/// Chart-ready numbers derived from one workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowMetrics {
    pub workflow_id: String,
    pub event_count: usize,
    pub status_count: usize,
    pub edge_count: usize,
    pub series: Vec<MetricPoint>,
    pub breakdown: Vec<MetricSlice>,
}

impl WorkflowMetrics {
    /// Synthetic monthly activity scaled by node counts. Deterministic.
    pub fn from_workflow(workflow: &WorkflowDescription) -> Self {
        let k = workflow.count(NodeKind::Event);
        let m = workflow.count(NodeKind::Status);
        let edges = workflow.edges.len();

        let series = MONTHS
            .iter()
            .enumerate()
            .map(|(i, &month)| MetricPoint {
                month,
                events: (k * 10 + i * k * 3 + (i % 2) * 5) as f32,
                statuses: (m * 8 + i * m * 2 + ((i + 1) % 2) * 4) as f32,
            })
            .collect();

        let breakdown = [("Events", k), ("Statuses", m), ("Transitions", edges)]
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| MetricSlice {
                label,
                value: count as f32,
            })
            .collect();

        Self {
            workflow_id: workflow.id.clone(),
            event_count: k,
            status_count: m,
            edge_count: edges,
            series,
            breakdown,
        }
    }

    pub fn max_value(&self) -> f32 {
        self.series
            .iter()
            .map(|point| point.events.max(point.statuses))
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesPath {
    pub name: &'static str,
    pub color: String,
    pub points: Vec<(f32, f32)>,
    /// Closed down to the baseline when drawn as an area.
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: &'static str,
    pub value: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub x: f32,
    pub y: f32,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieLayout {
    pub center: (f32, f32),
    pub radius: f32,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub tab: AnalyticsTab,
    pub width: f32,
    pub height: f32,
    pub plot_x: f32,
    pub plot_y: f32,
    pub plot_width: f32,
    pub plot_height: f32,
    pub categories: Vec<(String, f32)>,
    pub y_ticks: Vec<(String, f32)>,
    pub bars: Vec<ChartBar>,
    pub series: Vec<ChartSeriesPath>,
    pub pie: Option<PieLayout>,
    pub legend: Vec<LegendItem>,
    pub line_width: f32,
    pub area_opacity: f32,
}

pub fn compute_chart_layout(
    metrics: &WorkflowMetrics,
    tab: AnalyticsTab,
    config: &ChartConfig,
    theme: &Theme,
) -> ChartLayout {
    let width = config.width.max(1.0);
    let height = config.height.max(1.0);
    let plot_x = config.padding + config.y_axis_width;
    let plot_y = config.padding;
    let plot_width = (width - plot_x - config.padding).max(1.0);
    let plot_height = (height - plot_y - config.padding - config.x_axis_height).max(1.0);

    let mut layout = ChartLayout {
        tab,
        width,
        height,
        plot_x,
        plot_y,
        plot_width,
        plot_height,
        categories: Vec::new(),
        y_ticks: Vec::new(),
        bars: Vec::new(),
        series: Vec::new(),
        pie: None,
        legend: Vec::new(),
        line_width: config.line_width,
        area_opacity: config.area_opacity,
    };

    let series_names = [("Events", 0usize), ("Statuses", 1usize)];
    let legend_x = plot_x;
    let legend_y = height - config.legend_rect_size;

    if tab == AnalyticsTab::Pie {
        layout.pie = Some(pie_layout(metrics, config, theme, width, height));
        let mut y = plot_y;
        for (idx, slice) in metrics.breakdown.iter().enumerate() {
            layout.legend.push(LegendItem {
                x: width - config.padding - 120.0,
                y,
                label: format!("{} [{}]", slice.label, slice.value),
                color: theme.chart_color(idx).to_string(),
            });
            y += config.legend_rect_size + config.legend_spacing;
        }
        return layout;
    }

    let max_val = metrics.max_value();
    let range = if max_val > 0.0 { max_val } else { 1.0 };
    let slots = metrics.series.len().max(1);
    let group_width = plot_width / slots as f32;
    let baseline = plot_y + plot_height;
    let to_y = |value: f32| baseline - (value / range) * plot_height;

    layout.categories = metrics
        .series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            (
                point.month.to_string(),
                plot_x + i as f32 * group_width + group_width / 2.0,
            )
        })
        .collect();

    let ticks = config.tick_count.max(1);
    layout.y_ticks = (0..=ticks)
        .map(|i| {
            let fraction = i as f32 / ticks as f32;
            (
                format!("{:.0}", fraction * range),
                baseline - fraction * plot_height,
            )
        })
        .collect();

    let value_of = |point: &MetricPoint, series: usize| {
        if series == 0 { point.events } else { point.statuses }
    };

    match tab {
        AnalyticsTab::Bar => {
            let inner_pad = group_width * config.bar_group_padding;
            let bar_width = (group_width - inner_pad * 2.0) / series_names.len() as f32;
            for (i, point) in metrics.series.iter().enumerate() {
                for (series_idx, (_, series)) in series_names.iter().enumerate() {
                    let value = value_of(point, *series);
                    let y = to_y(value);
                    layout.bars.push(ChartBar {
                        x: plot_x
                            + i as f32 * group_width
                            + inner_pad
                            + series_idx as f32 * bar_width,
                        y,
                        width: bar_width,
                        height: baseline - y,
                        value,
                        color: theme.chart_color(series_idx).to_string(),
                    });
                }
            }
        }
        AnalyticsTab::Line | AnalyticsTab::Area => {
            let filled = tab == AnalyticsTab::Area;
            for (series_idx, (name, series)) in series_names.iter().enumerate() {
                let points = metrics
                    .series
                    .iter()
                    .zip(&layout.categories)
                    .map(|(point, (_, x))| (*x, to_y(value_of(point, *series))))
                    .collect();
                layout.series.push(ChartSeriesPath {
                    name: *name,
                    color: theme.chart_color(series_idx).to_string(),
                    points,
                    filled,
                });
            }
        }
        AnalyticsTab::Pie => {}
    }

    let mut x = legend_x;
    for (series_idx, (name, _)) in series_names.iter().enumerate() {
        layout.legend.push(LegendItem {
            x,
            y: legend_y,
            label: name.to_string(),
            color: theme.chart_color(series_idx).to_string(),
        });
        x += config.legend_rect_size + config.legend_spacing + name.len() as f32 * 8.0 + 16.0;
    }

    layout
}

fn pie_layout(
    metrics: &WorkflowMetrics,
    config: &ChartConfig,
    theme: &Theme,
    width: f32,
    height: f32,
) -> PieLayout {
    let radius = config
        .pie_radius
        .min(height / 2.0 - config.padding)
        .max(1.0);
    let center = (width / 2.0 - 60.0, height / 2.0);
    let total: f32 = metrics.breakdown.iter().map(|slice| slice.value).sum();
    let mut angle = 0.0_f32;
    let mut slices = Vec::new();
    if total > 0.0 {
        for (idx, slice) in metrics.breakdown.iter().enumerate() {
            let span = slice.value / total * PI * 2.0;
            slices.push(PieSlice {
                label: slice.label,
                value: slice.value,
                start_angle: angle,
                end_angle: angle + span,
                color: theme.chart_color(idx).to_string(),
            });
            angle += span;
        }
    }
    PieLayout {
        center,
        radius,
        slices,
    }
}
