pub(crate) mod types;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{NodeKind, WorkflowDescription};

/// Computes container size and row geometry for a two-row workflow diagram.
///
/// The wider of the two rows dictates the container width, clamped to
/// `[min_width, max_width]`. Leftover width is spread evenly between nodes
/// instead of trailing after the last one. Past `max_width` the spacing
/// stays at `min_spacing` and nodes overflow the container.
pub fn compute_layout(workflow: &WorkflowDescription, config: &LayoutConfig) -> LayoutResult {
    let event_count = workflow.count(NodeKind::Event);
    let status_count = workflow.count(NodeKind::Status);
    let max_nodes = event_count.max(status_count);

    let container_width = container_width(max_nodes, config);
    let container_height = container_height(config);
    let spacing = node_spacing(max_nodes, container_width, config);

    let event_row_y = config.row_offset;
    let status_row_y = event_row_y + config.stage_height + config.vertical_spacing;

    tracing::debug!(
        workflow = %workflow.id,
        event_count,
        status_count,
        container_width,
        container_height,
        spacing,
        "computed workflow layout"
    );

    LayoutResult {
        container_width,
        container_height,
        spacing,
        max_nodes,
        event_count,
        status_count,
        padding: config.padding,
        stage_width: config.stage_width,
        circle_size: config.circle_size,
        event_row_y,
        status_row_y,
    }
}

fn container_width(max_nodes: usize, config: &LayoutConfig) -> f32 {
    let count = max_nodes as f32;
    let gaps = max_nodes.saturating_sub(1) as f32;
    let raw = config.padding * 2.0 + count * config.stage_width + gaps * config.min_spacing;
    // f32::clamp panics on inverted bounds; a bad config must not.
    raw.max(config.min_width).min(config.max_width)
}

fn container_height(config: &LayoutConfig) -> f32 {
    let raw = config.padding * 2.0
        + config.stage_height
        + config.vertical_spacing
        + config.circle_size
        + config.height_allowance;
    raw.max(config.min_height)
}

fn node_spacing(max_nodes: usize, container_width: f32, config: &LayoutConfig) -> f32 {
    if max_nodes <= 1 {
        return 0.0;
    }
    let available = container_width - config.padding * 2.0;
    let total_stage_width = max_nodes as f32 * config.stage_width;
    let even = (available - total_stage_width) / (max_nodes - 1) as f32;
    even.max(config.min_spacing)
}
