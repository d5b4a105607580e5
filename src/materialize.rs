use crate::config::LayoutConfig;
use crate::ir::{NodeKind, WorkflowDescription};
use crate::layout::{NodeStyle, PositionedKind, PositionedNode, compute_layout};
use crate::theme::Theme;

/// Id of the container node for `workflow_id`. Namespaced so it cannot
/// collide with a source node id.
pub fn container_id(workflow_id: &str) -> String {
    format!("{workflow_id}::container")
}

/// Turns a workflow into the flat node list consumed by the diagram surface.
///
/// Order is fixed: the container, then one stage per event node, then one
/// circle per status node, each in input order. Child ids are the source
/// node ids so a surface can key re-renders off them; the container uses
/// [`container_id`]. A collapsed container keeps its
/// children in the list but marks them hidden.
pub fn materialize(
    workflow: &WorkflowDescription,
    expanded: bool,
    config: &LayoutConfig,
    theme: &Theme,
) -> Vec<PositionedNode> {
    let layout = compute_layout(workflow, config);
    let mut nodes = Vec::with_capacity(1 + workflow.nodes.len());
    let parent = container_id(&workflow.id);

    nodes.push(PositionedNode {
        id: parent.clone(),
        kind: PositionedKind::Container,
        label: workflow.name.clone(),
        x: 0.0,
        y: 0.0,
        width: layout.container_width,
        height: layout.container_height,
        parent_id: None,
        source_kind: None,
        hidden: false,
        expanded: Some(expanded),
        style: NodeStyle {
            fill: theme.container_fill.clone(),
            stroke: theme.container_border.clone(),
            stroke_width: 1.2,
            corner_radius: 12.0,
        },
    });

    for kind in [NodeKind::Event, NodeKind::Status] {
        let shape = PositionedKind::for_node_kind(kind);
        let (width, height) = match shape {
            PositionedKind::Stage => (config.stage_width, config.stage_height),
            _ => (config.circle_size, config.circle_size),
        };
        for (index, spec) in workflow.nodes_of(kind).enumerate() {
            let Some((x, y)) = layout.position_for(kind, index) else {
                continue;
            };
            nodes.push(PositionedNode {
                id: spec.id.clone(),
                kind: shape,
                label: spec.label.clone(),
                x,
                y,
                width,
                height,
                parent_id: Some(parent.clone()),
                source_kind: Some(kind),
                hidden: !expanded,
                expanded: None,
                style: child_style(shape, theme),
            });
        }
    }

    tracing::debug!(
        workflow = %workflow.id,
        count = nodes.len(),
        expanded,
        "materialized workflow nodes"
    );
    nodes
}

fn child_style(shape: PositionedKind, theme: &Theme) -> NodeStyle {
    match shape {
        PositionedKind::Stage => NodeStyle {
            fill: theme.stage_fill.clone(),
            stroke: theme.stage_border.clone(),
            stroke_width: 1.4,
            corner_radius: 8.0,
        },
        _ => NodeStyle {
            fill: theme.circle_fill.clone(),
            stroke: theme.circle_border.clone(),
            stroke_width: 1.4,
            corner_radius: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeSpec;

    fn sample() -> WorkflowDescription {
        let mut wf = WorkflowDescription::new("orders", "Orders");
        wf.nodes.push(NodeSpec::status("pending", "Pending"));
        wf.nodes.push(NodeSpec::event("submit", "Submit"));
        wf.nodes.push(NodeSpec::event("approve", "Approve"));
        wf.nodes.push(NodeSpec::status("done", "Done"));
        wf.nodes.push(NodeSpec::event("ship", "Ship"));
        wf
    }

    #[test]
    fn emits_container_then_stages_then_circles() {
        let nodes = materialize(&sample(), true, &LayoutConfig::default(), &Theme::light());
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["orders::container", "submit", "approve", "ship", "pending", "done"]);
        assert_eq!(nodes[0].kind, PositionedKind::Container);
        assert!(nodes[1..4].iter().all(|n| n.kind == PositionedKind::Stage));
        assert!(nodes[4..].iter().all(|n| n.kind == PositionedKind::Circular));
    }

    #[test]
    fn children_are_parented_and_sized() {
        let config = LayoutConfig::default();
        let nodes = materialize(&sample(), true, &config, &Theme::light());
        assert_eq!(nodes[0].width, 840.0);
        for node in &nodes[1..] {
            assert_eq!(node.parent_id.as_deref(), Some("orders::container"));
            assert!(!node.hidden);
            assert_eq!(node.expanded, None);
        }
        assert_eq!((nodes[1].width, nodes[1].height), (220.0, 80.0));
        assert_eq!((nodes[4].width, nodes[4].height), (60.0, 60.0));
    }

    #[test]
    fn collapsed_container_hides_children_but_keeps_count() {
        let nodes = materialize(&sample(), false, &LayoutConfig::default(), &Theme::light());
        assert_eq!(nodes.len(), 6);
        assert!(!nodes[0].hidden);
        assert_eq!(nodes[0].expanded, Some(false));
        assert!(nodes[1..].iter().all(|n| n.hidden));
    }

    #[test]
    fn container_id_does_not_collide_with_node_named_like_workflow() {
        let mut wf = WorkflowDescription::new("review", "Review");
        wf.nodes.push(NodeSpec::event("review", "Review"));
        let nodes = materialize(&wf, true, &LayoutConfig::default(), &Theme::light());
        assert_eq!(nodes[0].id, container_id("review"));
        assert_eq!(nodes[1].id, "review");
        assert_ne!(nodes[0].id, nodes[1].id);
    }

    #[test]
    fn materialize_is_idempotent() {
        let wf = sample();
        let config = LayoutConfig::default();
        let theme = Theme::light();
        assert_eq!(
            materialize(&wf, true, &config, &theme),
            materialize(&wf, true, &config, &theme)
        );
    }

    #[test]
    fn empty_workflow_yields_only_container() {
        let wf = WorkflowDescription::new("empty", "Empty");
        let nodes = materialize(&wf, true, &LayoutConfig::default(), &Theme::light());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].width, 500.0);
    }
}
