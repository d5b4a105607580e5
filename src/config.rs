use crate::theme::Theme;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing parameters for the two-row workflow diagram.
///
/// All values are expected to be positive. The layout engine does not check
/// this; a zero or negative value only produces degenerate geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fallback container width. The dynamic width calculation supersedes it.
    pub workflow_width: f32,
    /// Fallback container height. The dynamic height calculation supersedes it.
    pub workflow_height: f32,
    pub stage_width: f32,
    pub stage_height: f32,
    pub circle_size: f32,
    pub padding: f32,
    pub vertical_spacing: f32,
    pub min_spacing: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    /// Distance from the container top to the first row.
    pub row_offset: f32,
    /// Extra room below the second row.
    pub height_allowance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            workflow_width: 800.0,
            workflow_height: 400.0,
            stage_width: 220.0,
            stage_height: 80.0,
            circle_size: 60.0,
            padding: 30.0,
            vertical_spacing: 80.0,
            min_spacing: 60.0,
            min_width: 500.0,
            max_width: 1200.0,
            min_height: 350.0,
            row_offset: 70.0,
            height_allowance: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub y_axis_width: f32,
    pub x_axis_height: f32,
    pub tick_count: usize,
    pub bar_group_padding: f32,
    pub line_width: f32,
    pub area_opacity: f32,
    pub pie_radius: f32,
    pub legend_rect_size: f32,
    pub legend_spacing: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 32.0,
            y_axis_width: 48.0,
            x_axis_height: 32.0,
            tick_count: 5,
            bar_group_padding: 0.15,
            line_width: 2.0,
            area_opacity: 0.35,
            pie_radius: 110.0,
            legend_rect_size: 14.0,
            legend_spacing: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub chart: ChartConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::light();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            chart: ChartConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    container_fill: Option<String>,
    container_border: Option<String>,
    stage_fill: Option<String>,
    stage_border: Option<String>,
    circle_fill: Option<String>,
    circle_border: Option<String>,
    line_color: Option<String>,
    chart_colors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    workflow_width: Option<f32>,
    workflow_height: Option<f32>,
    stage_width: Option<f32>,
    stage_height: Option<f32>,
    circle_size: Option<f32>,
    padding: Option<f32>,
    vertical_spacing: Option<f32>,
    min_spacing: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChartConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    tick_count: Option<usize>,
    line_width: Option<f32>,
    area_opacity: Option<f32>,
    pie_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    chart: Option<ChartConfigFile>,
}

/// Parses JSON, falling back to JSON5 for hand-written files.
pub(crate) fn parse_relaxed_json<T: DeserializeOwned>(contents: &str) -> anyhow::Result<T> {
    match serde_json::from_str::<T>(contents) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str::<T>(contents)
            .map_err(|_| anyhow::anyhow!("invalid JSON: {json_err}")),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = parse_relaxed_json(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme: {theme_name}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.workflow_width {
            target.workflow_width = v;
        }
        if let Some(v) = layout.workflow_height {
            target.workflow_height = v;
        }
        if let Some(v) = layout.stage_width {
            target.stage_width = v;
        }
        if let Some(v) = layout.stage_height {
            target.stage_height = v;
        }
        if let Some(v) = layout.circle_size {
            target.circle_size = v;
        }
        if let Some(v) = layout.padding {
            target.padding = v;
        }
        if let Some(v) = layout.vertical_spacing {
            target.vertical_spacing = v;
        }
        if let Some(v) = layout.min_spacing {
            target.min_spacing = v;
        }
    }

    if let Some(chart) = parsed.chart {
        let target = &mut config.chart;
        if let Some(v) = chart.width {
            target.width = v;
        }
        if let Some(v) = chart.height {
            target.height = v;
        }
        if let Some(v) = chart.padding {
            target.padding = v;
        }
        if let Some(v) = chart.tick_count {
            target.tick_count = v;
        }
        if let Some(v) = chart.line_width {
            target.line_width = v;
        }
        if let Some(v) = chart.area_opacity {
            target.area_opacity = v;
        }
        if let Some(v) = chart.pie_radius {
            target.pie_radius = v;
        }
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.container_fill {
        theme.container_fill = v;
    }
    if let Some(v) = vars.container_border {
        theme.container_border = v;
    }
    if let Some(v) = vars.stage_fill {
        theme.stage_fill = v;
    }
    if let Some(v) = vars.stage_border {
        theme.stage_border = v;
    }
    if let Some(v) = vars.circle_fill {
        theme.circle_fill = v;
    }
    if let Some(v) = vars.circle_border {
        theme.circle_border = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(colors) = vars.chart_colors {
        for (slot, color) in theme.chart_colors.iter_mut().zip(colors) {
            *slot = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn overrides_layout_and_theme() {
        let config = parse_config(
            r##"{
                "theme": "dark",
                "themeVariables": { "stageFill": "#000000", "chartColors": ["#111111"] },
                "layout": { "stageWidth": 180, "padding": 20 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.layout.stage_width, 180.0);
        assert_eq!(config.layout.padding, 20.0);
        assert_eq!(config.layout.stage_height, 80.0);
        assert_eq!(config.theme.stage_fill, "#000000");
        assert_eq!(config.theme.chart_colors[0], "#111111");
        assert_eq!(config.theme.chart_colors[1], Theme::dark().chart_colors[1]);
        assert_eq!(config.render.background, Theme::dark().background);
    }

    #[test]
    fn accepts_json5() {
        let config = parse_config("{ layout: { circleSize: 48, }, }").unwrap();
        assert_eq!(config.layout.circle_size, 48.0);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }
}
