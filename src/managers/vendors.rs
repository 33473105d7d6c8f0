//! Third-party risk management registry.

use crate::managers::{org_id, page, per_page};
use crate::services::operation::{Operation, Param};

pub const VENDOR_STATUSES: &[&str] = &["active", "inactive", "under_review"];
pub const CRITICALITIES: &[&str] = &["critical", "high", "medium", "low"];

fn vendor_id() -> Param {
    Param::string("vendor_id").describe("Vendor ID")
}

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("list_vendors", "/organizations/{org_id}/vendors")
            .describe(
                "List third-party vendors in the organization's TPRM (Third-Party Risk \
                 Management) registry. Filter by status, criticality, or category.",
            )
            .in_path(org_id())
            .in_query(
                Param::one_of("status", VENDOR_STATUSES)
                    .optional()
                    .describe("Vendor status filter"),
            )
            .in_query(
                Param::one_of("criticality", CRITICALITIES)
                    .optional()
                    .describe("Vendor criticality filter"),
            )
            .in_query(page())
            .in_query(per_page()),
        Operation::get("get_vendor", "/organizations/{org_id}/vendors/{vendor_id}")
            .describe(
                "Get detailed vendor information including certifications, assessments, risk \
                 score, and research results.",
            )
            .in_path(org_id())
            .in_path(vendor_id()),
        Operation::post("create_vendor", "/organizations/{org_id}/vendors")
            .describe(
                "Add a new vendor to the TPRM registry. Triggers automatic risk scoring based on \
                 criticality and data handling.",
            )
            .in_path(org_id())
            .in_body(Param::string("name").describe("Vendor name"))
            .in_body(
                Param::string("description")
                    .optional()
                    .describe("Vendor description"),
            )
            .in_body(
                Param::string("category")
                    .optional()
                    .describe("Vendor category (e.g., 'SaaS', 'Infrastructure', 'Consulting')"),
            )
            .in_body(
                Param::one_of("criticality", CRITICALITIES)
                    .default("medium")
                    .describe("Vendor criticality"),
            )
            .in_body(
                Param::string("website")
                    .optional()
                    .describe("Vendor website URL"),
            )
            .in_body(
                Param::string("contact_email")
                    .optional()
                    .describe("Primary contact email"),
            ),
        Operation::post(
            "trigger_vendor_research",
            "/organizations/{org_id}/vendors/{vendor_id}/research",
        )
        .describe(
            "Trigger AI-powered security research for a vendor. Checks HIBP (breach databases), \
             NVD (vulnerability databases), and public security posture. Returns a task ID for \
             status polling.",
        )
        .in_path(org_id())
        .in_path(vendor_id()),
        Operation::get(
            "get_vendor_research",
            "/organizations/{org_id}/vendors/{vendor_id}/research/latest",
        )
        .describe(
            "Get the latest AI-powered research results for a vendor, including breach history, \
             known vulnerabilities, and security posture analysis.",
        )
        .in_path(org_id())
        .in_path(vendor_id()),
        Operation::post(
            "trigger_dpsia",
            "/organizations/{org_id}/vendors/{vendor_id}/dpsia",
        )
        .describe(
            "Trigger a Data Protection Security Impact Assessment (DPSIA) for a vendor. \
             Evaluates vendor security posture against CIA triad and certification \
             requirements.",
        )
        .in_path(org_id())
        .in_path(vendor_id()),
    ]
}
