//! Organization-scoped controls and their implementation tracking.
//! Paginated with `page`/`per_page`; addressed by `scoped_control_id`, never
//! by the catalog SCF code.

use crate::constants::limits::MAX_BATCH_OPERATIONS;
use crate::managers::{org_id, page, per_page};
use crate::services::operation::{Operation, Param};

pub const IMPLEMENTATION_STATUSES: &[&str] = &[
    "NOT_STARTED",
    "IN_PROGRESS",
    "IMPLEMENTED",
    "READY_FOR_REVIEW",
    "MONITORED",
    "NOT_APPLICABLE",
    "AT_RISK",
    "DEFERRED",
];

fn scoped_control_id() -> Param {
    Param::string("scoped_control_id").describe("Scoped control ID")
}

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("list_scoped_controls", "/organizations/{org_id}/scoped-controls")
            .describe(
                "List controls scoped to your organization with their implementation status. \
                 Supports filtering by status, framework, and search. Returns implementation \
                 progress across the 8-state workflow.",
            )
            .in_path(org_id())
            .in_query(
                Param::one_of("status", IMPLEMENTATION_STATUSES)
                    .optional()
                    .describe("Filter by implementation status"),
            )
            .in_query(
                Param::string("framework")
                    .optional()
                    .describe("Filter by framework"),
            )
            .in_query(Param::string("search").optional().describe("Search term"))
            .in_query(page())
            .in_query(per_page()),
        Operation::get(
            "get_scoped_control",
            "/organizations/{org_id}/scoped-controls/{scoped_control_id}",
        )
        .describe(
            "Get detailed implementation status of a specific scoped control, including owner, \
             notes, evidence links, and audit history.",
        )
        .in_path(org_id())
        .in_path(scoped_control_id()),
        Operation::patch(
            "update_scoped_control",
            "/organizations/{org_id}/scoped-controls/{scoped_control_id}",
        )
        .describe(
            "Update a scoped control's implementation tracking fields. Status transitions are \
             validated (e.g., NOT_STARTED -> IN_PROGRESS -> IMPLEMENTED). All fields are \
             optional; only provided fields are updated.",
        )
        .in_path(org_id())
        .in_path(scoped_control_id())
        .in_body(
            Param::one_of("implementation_status", IMPLEMENTATION_STATUSES)
                .optional()
                .describe("New implementation status"),
        )
        .in_body(
            Param::string("priority")
                .optional()
                .describe("Implementation priority (e.g., 'high', 'medium', 'low')"),
        )
        .in_body(
            Param::string("maturity_level")
                .optional()
                .describe("Control maturity level"),
        )
        .in_body(
            Param::string("owner")
                .optional()
                .describe("Control owner (person accountable)"),
        )
        .in_body(
            Param::string("assigned_to")
                .optional()
                .describe("Assignee (person responsible for implementation)"),
        )
        .in_body(
            Param::string("implementation_notes")
                .optional()
                .describe("Implementation notes and context"),
        )
        .in_body(
            Param::string("target_date")
                .optional()
                .describe("Target completion date (YYYY-MM-DD)"),
        )
        .in_body(
            Param::string("completion_date")
                .optional()
                .describe("Actual completion date (YYYY-MM-DD)"),
        )
        .in_body(Param::string("selection_reason").optional().describe(
            "Justification for scoping selection or status (required for NOT_APPLICABLE, DEFERRED)",
        )),
        Operation::get(
            "get_scoping_stats",
            "/organizations/{org_id}/scoped-controls/stats",
        )
        .describe(
            "Get implementation statistics for an organization: counts by status, completion \
             percentage, framework coverage breakdown.",
        )
        .in_path(org_id()),
        Operation::post(
            "scope_framework",
            "/organizations/{org_id}/scoped-controls/scope-framework",
        )
        .describe(
            "Bulk-scope all controls from a framework to your organization. This creates scoped \
             control entries for every control in the selected framework.",
        )
        .in_path(org_id())
        .in_body(
            Param::string("framework_id")
                .describe("Framework ID to scope (e.g., 'nist-800-53-r5')"),
        ),
        Operation::post(
            "batch_update_controls",
            "/organizations/{org_id}/scoped-controls/batch",
        )
        .describe(
            "Batch update multiple scoped controls in a single transaction. Maximum 500 \
             operations per request. Useful for bulk status changes or assignments.",
        )
        .in_path(org_id())
        .in_body(
            Param::objects(
                "operations",
                vec![
                    scoped_control_id(),
                    Param::one_of("status", IMPLEMENTATION_STATUSES).optional(),
                    Param::string("owner").optional(),
                    Param::string("notes").optional(),
                ],
            )
            .items(1, MAX_BATCH_OPERATIONS)
            .describe("Array of update operations"),
        ),
    ]
}
