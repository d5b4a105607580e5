pub mod analytics;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod materialize;
pub mod mock;
pub mod render;
pub mod surface;
pub mod theme;
pub mod view;

pub use analytics::{AnalyticsTab, WorkflowMetrics, compute_chart_layout};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartConfig, Config, LayoutConfig, load_config};
pub use error::VizError;
pub use ir::{EdgeSpec, NodeKind, NodeSpec, WorkflowDescription};
pub use layout::{LayoutResult, PositionedKind, PositionedNode, compute_layout};
pub use materialize::materialize;
pub use render::{render_chart_svg, render_diagram_svg, render_page_svg};
pub use surface::{DiagramSurface, LoggingSink, NodeEventSink};
pub use theme::Theme;
pub use view::{Route, ViewController, ViewState};

/// Renders the full page for `path` with the given tab active.
pub fn render_route(path: &str, tab: AnalyticsTab, config: &Config) -> String {
    let mut controller = ViewController::new();
    controller.navigate(path);
    controller.set_tab(tab);
    render_page_svg(&controller.view(config), config)
}

/// Renders the full page for a caller-supplied workflow.
pub fn render_workflow(
    workflow: &WorkflowDescription,
    tab: AnalyticsTab,
    config: &Config,
) -> String {
    let mut controller = ViewController::new();
    controller.set_tab(tab);
    render_page_svg(&controller.view_workflow(workflow, config), config)
}
