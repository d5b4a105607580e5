use serde::Deserialize;
use wasm_bindgen::prelude::*;
use workflow_viz::layout_dump::LayoutDump;
use workflow_viz::{AnalyticsTab, Config, DiagramSurface, Theme, WorkflowDescription, render_route};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowRenderOptions {
    theme: Option<String>,
    tab: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_config(options: &WorkflowRenderOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if let Some(name) = options.theme.as_deref() {
        config.theme = Theme::from_name(name).ok_or_else(|| format!("unknown theme: {name}"))?;
        config.render.background = config.theme.background.clone();
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    Ok(config)
}

fn render(route: &str, options: WorkflowRenderOptions) -> Result<String, String> {
    let config = build_config(&options)?;
    let tab = match options.tab.as_deref() {
        Some(name) => name.parse::<AnalyticsTab>().map_err(|error| error.to_string())?,
        None => AnalyticsTab::default(),
    };
    Ok(render_route(route, tab, &config))
}

fn layout_json(workflow_json: &str) -> Result<String, String> {
    let workflow: WorkflowDescription =
        serde_json::from_str(workflow_json).map_err(|error| error.to_string())?;
    let config = Config::default();
    let surface = DiagramSurface::build(&workflow, true, &config.layout, &config.theme);
    let dump = LayoutDump::from_surface(&surface, &workflow, &config.layout);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn render_workflow_svg(route: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = match options_json {
        Some(raw_options) => serde_json::from_str::<WorkflowRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?,
        None => WorkflowRenderOptions::default(),
    };
    render(route, options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn layout_workflow_json(workflow_json: &str) -> Result<String, JsValue> {
    layout_json(workflow_json).map_err(|error| JsValue::from_str(&error))
}
