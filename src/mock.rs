use crate::ir::{EdgeSpec, NodeSpec, WorkflowDescription};
use once_cell::sync::Lazy;

pub const DEFAULT_WORKFLOW_ID: &str = "order-processing";

static MOCK_WORKFLOWS: Lazy<Vec<WorkflowDescription>> = Lazy::new(|| {
    vec![
        workflow(
            DEFAULT_WORKFLOW_ID,
            "Order Processing",
            "Order lifecycle from placement to delivery",
            &[
                ("order-placed", "Order Placed", true),
                ("payment-received", "Payment Received", true),
                ("order-shipped", "Order Shipped", true),
                ("pending", "Pending", false),
                ("processing", "Processing", false),
            ],
            &[
                ("order-placed", "pending"),
                ("payment-received", "processing"),
                ("pending", "payment-received"),
                ("processing", "order-shipped"),
            ],
        ),
        workflow(
            "employee-onboarding",
            "Employee Onboarding",
            "Steps from signed offer to first day",
            &[
                ("offer-signed", "Offer Signed", true),
                ("equipment-issued", "Equipment Issued", true),
                ("invited", "Invited", false),
                ("provisioned", "Provisioned", false),
                ("active", "Active", false),
                ("review", "Probation Review", false),
            ],
            &[
                ("offer-signed", "invited"),
                ("invited", "provisioned"),
                ("equipment-issued", "active"),
                ("active", "review"),
            ],
        ),
        workflow(
            "support-ticket",
            "Support Ticket",
            "Customer ticket triage and resolution",
            &[
                ("ticket-opened", "Ticket Opened", true),
                ("agent-assigned", "Agent Assigned", true),
                ("customer-replied", "Customer Replied", true),
                ("resolved-event", "Resolution Sent", true),
                ("open", "Open", false),
                ("in-progress", "In Progress", false),
                ("closed", "Closed", false),
            ],
            &[
                ("ticket-opened", "open"),
                ("agent-assigned", "in-progress"),
                ("customer-replied", "in-progress"),
                ("resolved-event", "closed"),
            ],
        ),
    ]
});

/// `(id, label, is_event)` node rows and `(source, target)` edge rows.
fn workflow(
    id: &str,
    name: &str,
    description: &str,
    nodes: &[(&str, &str, bool)],
    edges: &[(&str, &str)],
) -> WorkflowDescription {
    let mut wf = WorkflowDescription::new(id, name);
    wf.description = description.to_string();
    wf.nodes = nodes
        .iter()
        .map(|(id, label, is_event)| {
            if *is_event {
                NodeSpec::event(id, label)
            } else {
                NodeSpec::status(id, label)
            }
        })
        .collect();
    wf.edges = edges
        .iter()
        .map(|(source, target)| EdgeSpec::new(source, target))
        .collect();
    wf
}

pub fn mock_workflows() -> &'static [WorkflowDescription] {
    &MOCK_WORKFLOWS
}

pub fn find_workflow(id: &str) -> Option<&'static WorkflowDescription> {
    MOCK_WORKFLOWS.iter().find(|wf| wf.id == id)
}
