use serde::Serialize;

use crate::ir::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionedKind {
    Container,
    Stage,
    Circular,
}

impl PositionedKind {
    /// Shape used for a source node kind. Events sit in the stage row,
    /// statuses in the circular row.
    pub fn for_node_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Event => Self::Stage,
            NodeKind::Status => Self::Circular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

/// One drawable node. Children are positioned relative to their parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub kind: PositionedKind,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub parent_id: Option<String>,
    pub source_kind: Option<NodeKind>,
    pub hidden: bool,
    /// Set on the container only.
    pub expanded: Option<bool>,
    pub style: NodeStyle,
}

impl PositionedNode {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Geometry of one layout pass. Ephemeral: recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub container_width: f32,
    pub container_height: f32,
    pub spacing: f32,
    pub max_nodes: usize,
    pub event_count: usize,
    pub status_count: usize,
    pub(crate) padding: f32,
    pub(crate) stage_width: f32,
    pub(crate) circle_size: f32,
    pub(crate) event_row_y: f32,
    pub(crate) status_row_y: f32,
}

impl LayoutResult {
    /// Top-left corner of the `index`-th node of `kind`, relative to the
    /// container. Returns `None` past the end of that row.
    pub fn position_for(&self, kind: NodeKind, index: usize) -> Option<(f32, f32)> {
        let count = match kind {
            NodeKind::Event => self.event_count,
            NodeKind::Status => self.status_count,
        };
        if index >= count {
            return None;
        }
        let x = self.padding + index as f32 * (self.stage_width + self.spacing);
        Some(match kind {
            NodeKind::Event => (x, self.event_row_y),
            NodeKind::Status => (
                x + self.stage_width / 2.0 - self.circle_size / 2.0,
                self.status_row_y,
            ),
        })
    }
}
