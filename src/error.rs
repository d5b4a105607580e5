#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VizError {
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("No route matches path: {0}")]
    RouteNotFound(String),

    #[error("Node not found on diagram surface: {0}")]
    NodeNotFound(String),

    #[error("Unknown analytics tab: {0}")]
    UnknownTab(String),

    #[error("Invalid workflow description: {0}")]
    InvalidWorkflow(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
