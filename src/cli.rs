use crate::analytics::{AnalyticsTab, compute_chart_layout};
use crate::config::{Config, load_config, parse_relaxed_json};
use crate::ir::WorkflowDescription;
use crate::layout_dump::write_layout_dump;
use crate::mock::mock_workflows;
use crate::render::{
    render_chart_svg, render_diagram_svg, render_not_found_svg, render_page_svg,
    write_output_png, write_output_svg,
};
use crate::view::{ViewController, ViewState};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wfviz", version, about = "Workflow diagram and analytics renderer")]
pub struct Args {
    /// Page route, e.g. /visualization/workflow/order-processing
    #[arg(short = 'r', long = "route", default_value = "/")]
    pub route: String,

    /// Workflow file (JSON or JSON5) rendered instead of a mock workflow
    #[arg(short = 'w', long = "workflow", conflicts_with = "route")]
    pub workflow: Option<PathBuf>,

    /// Active analytics tab
    #[arg(short = 't', long = "tab", value_enum, default_value = "bar")]
    pub tab: TabArg,

    /// What to render
    #[arg(short = 'v', long = "view", value_enum, default_value = "page")]
    pub view: ViewArg,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, chart)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Render the workflow container collapsed
    #[arg(long = "collapsed")]
    pub collapsed: bool,

    /// Dispatch a click on this node id before rendering (repeatable).
    /// The container is addressed as `<workflow-id>::container`.
    #[arg(long = "click")]
    pub click: Vec<String>,

    /// Write the positioned nodes as JSON to this file
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// List the built-in workflows and exit
    #[arg(long = "list")]
    pub list: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ViewArg {
    Page,
    Diagram,
    Chart,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TabArg {
    Bar,
    Line,
    Area,
    Pie,
}

impl From<TabArg> for AnalyticsTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Bar => AnalyticsTab::Bar,
            TabArg::Line => AnalyticsTab::Line,
            TabArg::Area => AnalyticsTab::Area,
            TabArg::Pie => AnalyticsTab::Pie,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // SVG goes to stdout, so logs must not.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if args.list {
        for wf in mock_workflows() {
            println!("{}\t{}\t{}", wf.id, wf.name, wf.description);
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let external = args.workflow.as_deref().map(read_workflow).transpose()?;

    let mut controller = ViewController::new();
    controller.navigate(&args.route);
    controller.set_tab(args.tab.into());
    if args.collapsed {
        controller.toggle_expanded();
    }

    let state = current_view(&controller, external.as_ref(), &config);
    if !args.click.is_empty() {
        let ViewState::Ready { surface, .. } = &state else {
            return Err(anyhow::anyhow!("Cannot click nodes on a not-found page"));
        };
        for id in &args.click {
            surface.click(id, &mut controller)?;
        }
    }
    // Clicks may have toggled the container.
    let state = current_view(&controller, external.as_ref(), &config);

    if let (Some(path), ViewState::Ready { workflow, surface, .. }) = (&args.dump_layout, &state) {
        write_layout_dump(path, surface, workflow, &config.layout)?;
    }

    let svg = render_view(&state, args.view, &config);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn current_view(
    controller: &ViewController,
    external: Option<&WorkflowDescription>,
    config: &Config,
) -> ViewState {
    match external {
        Some(workflow) => controller.view_workflow(workflow, config),
        None => controller.view(config),
    }
}

fn render_view(state: &ViewState, view: ViewArg, config: &Config) -> String {
    match (view, state) {
        (ViewArg::Page, _) => render_page_svg(state, config),
        (_, ViewState::NotFound { .. }) => render_not_found_svg(state, &config.theme),
        (ViewArg::Diagram, ViewState::Ready { surface, .. }) => {
            render_diagram_svg(surface, &config.theme)
        }
        (ViewArg::Chart, ViewState::Ready { metrics, tab, .. }) => {
            let chart = compute_chart_layout(metrics, *tab, &config.chart, &config.theme);
            render_chart_svg(&chart, &config.theme)
        }
    }
}

fn read_workflow(path: &Path) -> Result<WorkflowDescription> {
    let contents = std::fs::read_to_string(path)?;
    let workflow: WorkflowDescription = parse_relaxed_json(&contents)?;
    if workflow.id.trim().is_empty() {
        return Err(crate::error::VizError::InvalidWorkflow("missing id".to_string()).into());
    }
    Ok(workflow)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let args = Args::try_parse_from([
            "wfviz",
            "--route",
            "/visualization/workflow/support-ticket",
            "--tab",
            "pie",
            "--click",
            "open",
            "--click",
            "closed",
        ])
        .unwrap();
        assert_eq!(args.click, ["open", "closed"]);
        assert_eq!(AnalyticsTab::from(args.tab), AnalyticsTab::Pie);
        assert!(matches!(args.view, ViewArg::Page));
    }

    #[test]
    fn workflow_file_conflicts_with_route() {
        let result = Args::try_parse_from(["wfviz", "-r", "/", "-w", "flow.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn chart_view_of_missing_workflow_renders_not_found() {
        let mut controller = ViewController::new();
        controller.navigate("/visualization/workflow/ghost");
        let config = Config::default();
        let svg = render_view(&controller.view(&config), ViewArg::Chart, &config);
        assert!(svg.contains("Workflow not found: ghost"));
    }

    #[test]
    fn ensure_output_requires_path_for_png() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
