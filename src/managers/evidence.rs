use crate::managers::org_id;
use crate::services::operation::{Operation, Param};

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("list_evidence", "/organizations/{org_id}/evidence-tracking")
            .describe(
                "List evidence items tracked for an organization's controls. Evidence \
                 demonstrates control implementation for audit readiness. Returns evidence with \
                 status, maturity, and linked controls.",
            )
            .in_path(org_id())
            .in_query(
                Param::string("system_id")
                    .optional()
                    .describe("Filter by system ID"),
            ),
        Operation::post("create_evidence", "/organizations/{org_id}/evidence-tracking")
            .describe(
                "Create a new evidence item linked to a control. Evidence items track artifacts \
                 that demonstrate control implementation.",
            )
            .in_path(org_id())
            .in_body(
                Param::string("control_id")
                    .optional()
                    .describe("Scoped control ID to link evidence to"),
            )
            .in_body(Param::string("title").describe("Evidence title"))
            .in_body(
                Param::string("description")
                    .optional()
                    .describe("Evidence description"),
            )
            .in_body(
                Param::string("evidence_type")
                    .optional()
                    .describe("Type of evidence (e.g., 'document', 'screenshot', 'log')"),
            ),
        Operation::get(
            "get_evidence_maturity",
            "/organizations/{org_id}/evidence-maturity-summary",
        )
        .describe(
            "Get evidence maturity summary for an organization. Shows average maturity score, \
             automation percentage, distribution by maturity level, and improvement \
             opportunities.",
        )
        .in_path(org_id()),
        Operation::get("list_evidence_tasks", "/evidence-tasks")
            .describe(
                "List evidence collection tasks: the work queue for gathering evidence. Shows \
                 what needs to be collected, by whom, and by when.",
            )
            .in_query(
                Param::string("org_id")
                    .optional()
                    .describe("Organization ID (UUID)"),
            )
            .in_query(
                Param::string("assignee")
                    .optional()
                    .describe("Filter by assigned user"),
            )
            .in_query(
                Param::string("status")
                    .optional()
                    .describe("Filter by task status"),
            ),
    ]
}
