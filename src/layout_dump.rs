use crate::config::LayoutConfig;
use crate::ir::{NodeKind, WorkflowDescription};
use crate::layout::{PositionedKind, compute_layout};
use crate::surface::DiagramSurface;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub workflow_id: String,
    pub container_width: f32,
    pub container_height: f32,
    pub spacing: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub kind: PositionedKind,
    pub source_kind: Option<NodeKind>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub parent_id: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub source: String,
    pub target: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_surface(
        surface: &DiagramSurface,
        workflow: &WorkflowDescription,
        config: &LayoutConfig,
    ) -> Self {
        let layout = compute_layout(workflow, config);
        let nodes = surface
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                kind: node.kind,
                source_kind: node.source_kind,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                parent_id: node.parent_id.clone(),
                hidden: node.hidden,
            })
            .collect();

        let edges = surface
            .edges
            .iter()
            .map(|edge| EdgeDump {
                source: edge.source.clone(),
                target: edge.target.clone(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            workflow_id: surface.workflow_id.clone(),
            container_width: layout.container_width,
            container_height: layout.container_height,
            spacing: layout.spacing,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    surface: &DiagramSurface,
    workflow: &WorkflowDescription,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_surface(surface, workflow, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DEFAULT_WORKFLOW_ID, find_workflow};
    use crate::theme::Theme;

    #[test]
    fn dump_serializes_kinds_in_lowercase() {
        let workflow = find_workflow(DEFAULT_WORKFLOW_ID).unwrap();
        let config = LayoutConfig::default();
        let surface = DiagramSurface::build(workflow, true, &config, &Theme::light());
        let dump = LayoutDump::from_surface(&surface, workflow, &config);
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["workflowId"], DEFAULT_WORKFLOW_ID);
        assert_eq!(json["nodes"][0]["kind"], "container");
        assert_eq!(json["nodes"][1]["kind"], "stage");
        assert_eq!(json["nodes"][1]["sourceKind"], "event");
        assert_eq!(json["containerWidth"], 840.0);
    }
}
