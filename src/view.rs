use crate::analytics::{AnalyticsTab, WorkflowMetrics};
use crate::config::Config;
use crate::error::VizError;
use crate::ir::WorkflowDescription;
use crate::layout::PositionedNode;
use crate::mock::{DEFAULT_WORKFLOW_ID, find_workflow};
use crate::surface::{DiagramSurface, LoggingSink, NodeEventSink};
use once_cell::sync::Lazy;
use regex::Regex;

static VISUALIZATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/visualization/([^/]+)/([^/]+)/?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// `kind` is carried for the URL shape only; layout ignores it.
    Visualization { kind: String, id: String },
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() || path == "/" {
            return Self::Home;
        }
        if let Some(caps) = VISUALIZATION_RE.captures(path) {
            return Self::Visualization {
                kind: caps[1].to_string(),
                id: caps[2].to_string(),
            };
        }
        Self::NotFound(path.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Ready {
        workflow: WorkflowDescription,
        surface: DiagramSurface,
        metrics: WorkflowMetrics,
        tab: AnalyticsTab,
    },
    NotFound {
        reason: VizError,
    },
}

impl ViewState {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Page-level state: which workflow is selected, which tab is active and
/// whether the diagram container is expanded.
#[derive(Debug, Clone)]
pub struct ViewController {
    route: Route,
    selected_id: String,
    tab: AnalyticsTab,
    expanded: bool,
    clicks: Vec<String>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            route: Route::Home,
            selected_id: DEFAULT_WORKFLOW_ID.to_string(),
            tab: AnalyticsTab::default(),
            expanded: true,
            clicks: Vec::new(),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn selected_id(&self) -> &str {
        &self.selected_id
    }

    pub fn tab(&self) -> AnalyticsTab {
        self.tab
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Ids of nodes clicked so far, oldest first.
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    pub fn navigate(&mut self, path: &str) {
        let route = Route::parse(path);
        match &route {
            Route::Home => self.set_selected(DEFAULT_WORKFLOW_ID),
            Route::Visualization { id, .. } => self.set_selected(id),
            Route::NotFound(path) => tracing::warn!(%path, "no route matches path"),
        }
        self.route = route;
    }

    /// Selects a workflow directly. The route follows the selection, so a
    /// previous not-found route no longer applies.
    pub fn select_workflow(&mut self, id: &str) {
        self.set_selected(id);
        self.route = if id == DEFAULT_WORKFLOW_ID {
            Route::Home
        } else {
            Route::Visualization {
                kind: "workflow".to_string(),
                id: id.to_string(),
            }
        };
    }

    fn set_selected(&mut self, id: &str) {
        if self.selected_id != id {
            tracing::info!(from = %self.selected_id, to = %id, "workflow selection changed");
            self.selected_id = id.to_string();
        }
    }

    pub fn set_tab(&mut self, tab: AnalyticsTab) {
        self.tab = tab;
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// The single recovery action of the not-found screen.
    pub fn recover(&mut self) {
        tracing::info!("returning to default workflow");
        self.select_workflow(DEFAULT_WORKFLOW_ID);
    }

    /// Recomputes the whole page from the current state.
    pub fn view(&self, config: &Config) -> ViewState {
        if let Route::NotFound(path) = &self.route {
            return ViewState::NotFound {
                reason: VizError::RouteNotFound(path.clone()),
            };
        }
        let Some(workflow) = find_workflow(&self.selected_id) else {
            tracing::warn!(id = %self.selected_id, "selected workflow not found");
            return ViewState::NotFound {
                reason: VizError::WorkflowNotFound(self.selected_id.clone()),
            };
        };
        self.view_workflow(workflow, config)
    }

    /// Same as [`ViewController::view`] but for a workflow supplied by the caller.
    pub fn view_workflow(&self, workflow: &WorkflowDescription, config: &Config) -> ViewState {
        ViewState::Ready {
            workflow: workflow.clone(),
            surface: DiagramSurface::build(workflow, self.expanded, &config.layout, &config.theme),
            metrics: WorkflowMetrics::from_workflow(workflow),
            tab: self.tab,
        }
    }
}

impl NodeEventSink for ViewController {
    fn node_clicked(&mut self, node: &PositionedNode) {
        LoggingSink.node_clicked(node);
        self.clicks.push(node.id.clone());
    }

    fn container_toggled(&mut self, container_id: &str) {
        LoggingSink.container_toggled(container_id);
        self.toggle_expanded();
        tracing::debug!(expanded = self.expanded, "expansion flag updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::container_id;

    #[test]
    fn parses_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(
            Route::parse("/visualization/workflow/support-ticket/"),
            Route::Visualization {
                kind: "workflow".to_string(),
                id: "support-ticket".to_string()
            }
        );
        assert_eq!(
            Route::parse("/visualization/x/y?tab=pie"),
            Route::Visualization {
                kind: "x".to_string(),
                id: "y".to_string()
            }
        );
        assert_eq!(Route::parse("/settings"), Route::NotFound("/settings".to_string()));
        assert!(matches!(Route::parse("/visualization/only-type"), Route::NotFound(_)));
    }

    #[test]
    fn navigation_selects_workflow() {
        let mut controller = ViewController::new();
        controller.navigate("/visualization/flow/employee-onboarding");
        assert_eq!(controller.selected_id(), "employee-onboarding");
        let ViewState::Ready { workflow, .. } = controller.view(&Config::default()) else {
            panic!("expected ready view");
        };
        assert_eq!(workflow.id, "employee-onboarding");
    }

    #[test]
    fn missing_workflow_renders_not_found_and_recovers() {
        let mut controller = ViewController::new();
        controller.navigate("/visualization/flow/does-not-exist");
        let state = controller.view(&Config::default());
        assert_eq!(
            state,
            ViewState::NotFound {
                reason: VizError::WorkflowNotFound("does-not-exist".to_string())
            }
        );
        controller.recover();
        assert_eq!(controller.selected_id(), DEFAULT_WORKFLOW_ID);
        assert!(!controller.view(&Config::default()).is_not_found());
    }

    #[test]
    fn unknown_route_renders_not_found() {
        let mut controller = ViewController::new();
        controller.navigate("/nope");
        assert!(controller.view(&Config::default()).is_not_found());
        controller.recover();
        assert_eq!(controller.route(), &Route::Home);
    }

    #[test]
    fn selecting_after_unknown_route_shows_workflow() {
        let mut controller = ViewController::new();
        controller.navigate("/nope");
        assert!(controller.view(&Config::default()).is_not_found());

        controller.select_workflow("support-ticket");
        assert_eq!(
            controller.route(),
            &Route::Visualization {
                kind: "workflow".to_string(),
                id: "support-ticket".to_string()
            }
        );
        let ViewState::Ready { workflow, .. } = controller.view(&Config::default()) else {
            panic!("expected ready view");
        };
        assert_eq!(workflow.id, "support-ticket");

        controller.select_workflow(DEFAULT_WORKFLOW_ID);
        assert_eq!(controller.route(), &Route::Home);
    }

    #[test]
    fn surface_clicks_flow_back_into_controller() {
        let mut controller = ViewController::new();
        let config = Config::default();
        let ViewState::Ready { surface, .. } = controller.view(&config) else {
            panic!("expected ready view");
        };
        surface.click("order-placed", &mut controller).unwrap();
        surface.click(&container_id(DEFAULT_WORKFLOW_ID), &mut controller).unwrap();
        assert_eq!(controller.clicks(), ["order-placed"]);
        assert!(!controller.is_expanded());

        let ViewState::Ready { surface, .. } = controller.view(&config) else {
            panic!("expected ready view");
        };
        assert_eq!(surface.visible_nodes().count(), 1);
    }

    #[test]
    fn tab_persists_across_selection() {
        let mut controller = ViewController::new();
        controller.set_tab(AnalyticsTab::Pie);
        controller.navigate("/visualization/flow/support-ticket");
        let ViewState::Ready { tab, metrics, .. } = controller.view(&Config::default()) else {
            panic!("expected ready view");
        };
        assert_eq!(tab, AnalyticsTab::Pie);
        assert_eq!(metrics.event_count, 4);
    }
}
