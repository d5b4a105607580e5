use crate::config::LayoutConfig;
use crate::error::{Result, VizError};
use crate::ir::WorkflowDescription;
use crate::layout::{PositionedKind, PositionedNode};
use crate::materialize::materialize;
use crate::theme::Theme;

/// Receives interaction from a diagram surface.
///
/// The owner of the surface supplies the sink, so node records stay plain
/// data and never carry behavior of their own.
pub trait NodeEventSink {
    fn node_clicked(&mut self, node: &PositionedNode);
    fn container_toggled(&mut self, container_id: &str);
}

/// Sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl NodeEventSink for LoggingSink {
    fn node_clicked(&mut self, node: &PositionedNode) {
        tracing::info!(node = %node.id, label = %node.label, kind = ?node.kind, "node clicked");
    }

    fn container_toggled(&mut self, container_id: &str) {
        tracing::info!(container = %container_id, "container toggled");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub points: Vec<(f32, f32)>,
}

/// Materialized nodes plus routed connectors for one workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSurface {
    pub workflow_id: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<SurfaceEdge>,
}

impl DiagramSurface {
    pub fn build(
        workflow: &WorkflowDescription,
        expanded: bool,
        config: &LayoutConfig,
        theme: &Theme,
    ) -> Self {
        let nodes = materialize(workflow, expanded, config, theme);
        Self::from_nodes(workflow, nodes)
    }

    pub fn from_nodes(workflow: &WorkflowDescription, nodes: Vec<PositionedNode>) -> Self {
        let (width, height) = nodes
            .iter()
            .find(|node| node.kind == PositionedKind::Container)
            .map(|node| (node.width, node.height))
            .unwrap_or((0.0, 0.0));

        let mut edges = Vec::new();
        for edge in &workflow.edges {
            let source = nodes.iter().find(|n| n.id == edge.source && n.parent_id.is_some());
            let target = nodes.iter().find(|n| n.id == edge.target && n.parent_id.is_some());
            // Dangling or hidden endpoints are not drawn.
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            if source.hidden || target.hidden || source.id == target.id {
                continue;
            }
            let to = target.center();
            let from = source.center();
            edges.push(SurfaceEdge {
                source: source.id.clone(),
                target: target.id.clone(),
                label: edge.label.clone(),
                points: vec![boundary_point(source, to), boundary_point(target, from)],
            });
        }

        Self {
            workflow_id: workflow.id.clone(),
            width,
            height,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(|node| !node.hidden)
    }

    /// Routes a click on `id` to `sink`. Containers toggle; hidden nodes
    /// cannot be clicked.
    pub fn click(&self, id: &str, sink: &mut dyn NodeEventSink) -> Result<()> {
        let node = self
            .node(id)
            .filter(|node| !node.hidden)
            .ok_or_else(|| VizError::NodeNotFound(id.to_string()))?;
        match node.kind {
            PositionedKind::Container => sink.container_toggled(&node.id),
            PositionedKind::Stage | PositionedKind::Circular => sink.node_clicked(node),
        }
        Ok(())
    }
}

/// Point where the segment from the node center toward `toward` leaves the
/// node outline.
fn boundary_point(node: &PositionedNode, toward: (f32, f32)) -> (f32, f32) {
    let (cx, cy) = node.center();
    let dx = toward.0 - cx;
    let dy = toward.1 - cy;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return (cx, cy);
    }
    match node.kind {
        PositionedKind::Circular => {
            let r = node.width / 2.0;
            (cx + dx / len * r, cy + dy / len * r)
        }
        _ => {
            let half_w = node.width / 2.0;
            let half_h = node.height / 2.0;
            let scale_x = axis_scale(half_w, dx);
            let scale_y = axis_scale(half_h, dy);
            let scale = scale_x.min(scale_y);
            (cx + dx * scale, cy + dy * scale)
        }
    }
}

fn axis_scale(half_extent: f32, delta: f32) -> f32 {
    if delta.abs() > f32::EPSILON {
        half_extent / delta.abs()
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EdgeSpec, NodeSpec};
    use crate::materialize::container_id;

    #[derive(Default)]
    struct Recorder {
        clicked: Vec<String>,
        toggled: Vec<String>,
    }

    impl NodeEventSink for Recorder {
        fn node_clicked(&mut self, node: &PositionedNode) {
            self.clicked.push(node.id.clone());
        }

        fn container_toggled(&mut self, container_id: &str) {
            self.toggled.push(container_id.to_string());
        }
    }

    fn sample() -> WorkflowDescription {
        let mut wf = WorkflowDescription::new("wf", "Workflow");
        wf.nodes.push(NodeSpec::event("go", "Go"));
        wf.nodes.push(NodeSpec::status("open", "Open"));
        wf.edges.push(EdgeSpec::new("go", "open"));
        wf.edges.push(EdgeSpec::new("go", "missing"));
        wf
    }

    fn build(workflow: &WorkflowDescription, expanded: bool) -> DiagramSurface {
        DiagramSurface::build(workflow, expanded, &LayoutConfig::default(), &Theme::light())
    }

    #[test]
    fn click_dispatches_by_kind() {
        let surface = build(&sample(), true);
        let mut sink = Recorder::default();
        surface.click("go", &mut sink).unwrap();
        surface.click(&container_id("wf"), &mut sink).unwrap();
        assert_eq!(sink.clicked, ["go"]);
        assert_eq!(sink.toggled, [container_id("wf")]);
        assert_eq!(
            surface.click("nope", &mut sink),
            Err(VizError::NodeNotFound("nope".to_string()))
        );
    }

    #[test]
    fn hidden_nodes_reject_clicks_and_drop_edges() {
        let surface = build(&sample(), false);
        let mut sink = Recorder::default();
        assert!(surface.click("go", &mut sink).is_err());
        assert!(surface.edges.is_empty());
        assert_eq!(surface.visible_nodes().count(), 1);
    }

    #[test]
    fn node_sharing_workflow_id_is_clickable() {
        let mut wf = WorkflowDescription::new("review", "Review");
        wf.nodes.push(NodeSpec::event("review", "Review"));
        wf.nodes.push(NodeSpec::status("done", "Done"));
        wf.edges.push(EdgeSpec::new("review", "done"));
        let surface = build(&wf, true);
        let mut sink = Recorder::default();
        surface.click("review", &mut sink).unwrap();
        surface.click(&container_id("review"), &mut sink).unwrap();
        assert_eq!(sink.clicked, ["review"]);
        assert_eq!(sink.toggled, [container_id("review")]);
        assert_eq!(surface.node("review").map(|n| n.kind), Some(PositionedKind::Stage));
        assert_eq!(surface.edges.len(), 1);
    }

    #[test]
    fn logging_sink_accepts_every_kind() {
        let surface = build(&sample(), true);
        let mut sink = LoggingSink;
        assert!(surface.click("go", &mut sink).is_ok());
        assert!(surface.click("open", &mut sink).is_ok());
        assert!(surface.click(&container_id("wf"), &mut sink).is_ok());
        assert!(surface.click("missing", &mut sink).is_err());
    }

    #[test]
    fn edges_skip_dangling_targets_and_end_on_outlines() {
        let surface = build(&sample(), true);
        assert_eq!(surface.edges.len(), 1);
        let edge = &surface.edges[0];
        let stage = surface.node("go").unwrap();
        let circle = surface.node("open").unwrap();
        // Stage bottom edge, circle top.
        assert!((edge.points[0].1 - (stage.y + stage.height)).abs() < 1e-3);
        assert!((edge.points[1].1 - circle.y).abs() < 1e-3);
    }
}
