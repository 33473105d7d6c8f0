//! Capability themes, capabilities and the infrastructure system inventory.

use crate::managers::org_id;
use crate::services::operation::{Operation, Param};

pub const SYSTEM_TYPES: &[&str] = &[
    "cloud_provider",
    "identity_provider",
    "ticketing",
    "logging",
    "security_tool",
    "code_repository",
    "document_management",
    "custom",
];
pub const SYSTEM_STATUSES: &[&str] = &["active", "inactive", "deprecated"];

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get(
            "list_capability_themes",
            "/organizations/{org_id}/capability-themes",
        )
        .describe(
            "List the 11 KSI-aligned capability themes for an organization. Capability themes \
             group NIST 800-53 controls into security capability areas, providing a high-level \
             view of security posture.",
        )
        .in_path(org_id()),
        Operation::get(
            "list_capabilities",
            "/organizations/{org_id}/evidence-capabilities",
        )
        .describe(
            "List capabilities for an organization. Capabilities map to systems and evidence, \
             showing what security functions your infrastructure supports.",
        )
        .in_path(org_id()),
        Operation::get("list_systems", "/organizations/{org_id}/systems")
            .describe(
                "List infrastructure systems in the organization's inventory. Systems are the \
                 tools and platforms that implement security capabilities.",
            )
            .in_path(org_id()),
        Operation::post("create_system", "/organizations/{org_id}/systems")
            .describe(
                "Add a system to the organization's infrastructure inventory. Systems can be \
                 linked to capabilities and evidence.",
            )
            .in_path(org_id())
            .in_body(Param::string("name").describe("System name"))
            .in_body(
                Param::string("description")
                    .optional()
                    .describe("System description"),
            )
            .in_body(Param::one_of("system_type", SYSTEM_TYPES).describe("System type"))
            .in_body(
                Param::one_of("status", SYSTEM_STATUSES)
                    .default("active")
                    .describe("System status"),
            )
            .in_body(
                Param::string("vendor")
                    .optional()
                    .describe("Vendor ID for this system, from list_vendors"),
            )
            .in_body(
                Param::string("category")
                    .optional()
                    .describe("System category (e.g., 'SIEM', 'Endpoint', 'Identity')"),
            ),
        Operation::patch(
            "update_system",
            "/organizations/{org_id}/systems/{system_id}",
        )
        .describe(
            "Update an existing system record. All fields are optional; only provided fields \
             are updated.",
        )
        .in_path(org_id())
        .in_path(Param::string("system_id").describe("System ID from list_systems"))
        .in_body(Param::string("name").optional().describe("System name"))
        .in_body(
            Param::string("description")
                .optional()
                .describe("System description"),
        )
        .in_body(
            Param::one_of("system_type", SYSTEM_TYPES)
                .optional()
                .describe("System type"),
        )
        .in_body(
            Param::one_of("status", SYSTEM_STATUSES)
                .optional()
                .describe("System status"),
        )
        .in_body(
            Param::string("vendor")
                .optional()
                .describe("Vendor ID for this system"),
        )
        .in_body(
            Param::string("category")
                .optional()
                .describe("System category"),
        ),
    ]
}
