use crate::constants::limits::{DEFAULT_AUDIT_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::managers::{limit, offset, org_id};
use crate::services::operation::{Operation, Param};

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("get_current_user", "/users/me").describe(
            "Get the current authenticated user's profile, including name, email, \
             organizations, and role.",
        ),
        Operation::get("list_organizations", "/organizations").describe(
            "List organizations the current user has access to. Returns org ID, name, tier, and \
             member count.",
        ),
        Operation::get("get_organization", "/organizations/{org_id}")
            .describe(
                "Get detailed organization information including subscription tier, member \
                 count, usage limits, and settings.",
            )
            .in_path(org_id()),
        Operation::get("list_members", "/organizations/{org_id}/members")
            .describe("List members of an organization with their roles (admin, editor, viewer).")
            .in_path(org_id()),
        Operation::get("get_work_queue", "/users/me/dashboard").describe(
            "Get the authenticated user's work queue: a prioritized list of pending tasks, \
             assignments, and action items across all their organizations.",
        ),
        Operation::get("get_audit_log", "/organizations/{org_id}/audit-log")
            .describe(
                "Get the audit trail for an organization. Shows field-level changes to controls, \
                 evidence, and other entities with actor, timestamp, and before/after values. \
                 Pagination uses limit/offset.",
            )
            .in_path(org_id())
            .in_query(limit(DEFAULT_AUDIT_PAGE_SIZE))
            .in_query(offset()),
        Operation::get("get_notifications", "/notifications")
            .describe(
                "Get notifications for the current user: new assignments, comments, status \
                 changes, and system alerts.",
            )
            .in_query(
                Param::boolean("unread_only")
                    .default(false)
                    .describe("Only return unread notifications"),
            )
            .in_query(
                limit(DEFAULT_PAGE_SIZE).describe("Number of notifications to return (max 100)"),
            ),
    ]
}
