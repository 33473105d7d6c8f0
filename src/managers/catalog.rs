//! Reference catalog: controls, frameworks, domains, evidence types and
//! assessment objectives. Paginated with `limit`/`offset`.

use crate::constants::limits::DEFAULT_PAGE_SIZE;
use crate::errors::ToolError;
use crate::managers::{limit, offset};
use crate::services::api_client::ApiRequest;
use crate::services::operation::{render_path, Operation, Param, ToolArgs};

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("list_controls", "/catalog/controls")
            .describe(
                "List SCF security controls from the reference catalog. Returns paginated controls \
                 with SCF ID, title, description, and mapped frameworks. Use domain or search \
                 filters to narrow results. Pagination uses limit/offset.",
            )
            .in_query(
                Param::string("search")
                    .optional()
                    .describe("Search term to filter controls by title or description"),
            )
            .in_query(
                Param::string("domain")
                    .optional()
                    .describe("Filter by compliance domain identifier (e.g., 'GOV', 'AST', 'IAC')"),
            )
            .in_query(
                Param::string("framework")
                    .optional()
                    .describe("Filter by framework (e.g., 'nist-800-53', 'iso-27001')"),
            )
            .in_query(limit(DEFAULT_PAGE_SIZE))
            .in_query(offset()),
        Operation::get("get_control", "/catalog/controls/{scf_id}")
            .describe(
                "Get detailed information about a specific SCF control by its ID (e.g., AST-01, \
                 IAC-15, GOV-02). Returns the control description, mapped frameworks, assessment \
                 objectives, and linked evidence items from the reference catalog.",
            )
            .in_path(
                Param::string("scf_id")
                    .describe("The SCF control identifier (e.g., 'AST-01', 'IAC-15', 'GOV-02')"),
            )
            .primary_as("control")
            .related(
                "assessment_objectives",
                "/catalog/controls/{scf_id}/assessment-objectives",
            )
            .related("evidence_items", "/catalog/controls/{scf_id}/evidence"),
        Operation::get("list_frameworks", "/catalog/frameworks").describe(
            "List all compliance frameworks mapped in the SCF catalog. Returns framework \
             identifiers and names. Includes NIST 800-53, ISO 27001, SOC 2, FedRAMP, GDPR, and \
             350+ other frameworks.",
        ),
        Operation::get("list_domains", "/catalog/domains").describe(
            "List all compliance domains in the SCF taxonomy. Domains group related security \
             controls (e.g., GOV = Governance, AST = Asset Management, IAC = Identity & Access \
             Control).",
        ),
        Operation::get("list_evidence_catalog", "/catalog/evidence")
            .describe(
                "List evidence items from the SCF reference catalog. These are the 272 standard \
                 evidence types that can be collected to demonstrate control implementation. \
                 Pagination uses limit/offset.",
            )
            .in_query(
                Param::string("search")
                    .optional()
                    .describe("Search term to filter evidence items by title or description"),
            )
            .in_query(limit(DEFAULT_PAGE_SIZE))
            .in_query(offset()),
        Operation::get("list_assessment_objectives", "/catalog/assessment-objectives")
            .describe(
                "List assessment objectives from the SCF reference catalog. These are the 5,736 \
                 specific test criteria used to evaluate control implementation. Filter by SCF \
                 control ID to get objectives for a specific control. Pagination uses \
                 limit/offset.",
            )
            .in_path(
                Param::string("control_id")
                    .optional()
                    .describe("Filter by SCF control ID (e.g., 'GOV-01', 'AST-02')"),
            )
            .in_query(
                Param::string("search")
                    .optional()
                    .describe("Search term to filter assessment objectives"),
            )
            .in_query(limit(DEFAULT_PAGE_SIZE))
            .in_query(offset())
            .route_with(assessment_objectives_route),
    ]
}

/// Objectives of one control live under the control; the unfiltered listing
/// has its own collection.
fn assessment_objectives_route(
    operation: &Operation,
    args: &ToolArgs,
) -> Result<ApiRequest, ToolError> {
    let path = match args.str("control_id") {
        Some(_) => render_path("/catalog/controls/{control_id}/assessment-objectives", args)?,
        None => operation.path.to_string(),
    };
    Ok(operation.request_at(path, args))
}
