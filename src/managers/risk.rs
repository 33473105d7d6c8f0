//! Risk register. Listings use `page`/`per_page`; scores sit on the 5x5 matrix.

use crate::constants::limits::{RISK_SCORE_MAX, RISK_SCORE_MIN};
use crate::managers::{org_id, page, per_page};
use crate::services::operation::{Operation, Param};

pub fn operations() -> Vec<Operation> {
    vec![
        Operation::get("list_risks", "/organizations/{org_id}/risk-assessments")
            .describe(
                "List risk assessments in the organization's risk register. Returns risks with \
                 likelihood, impact, treatment status, and linked controls.",
            )
            .in_path(org_id())
            .in_query(
                Param::string("status")
                    .optional()
                    .describe("Filter by treatment status"),
            )
            .in_query(page())
            .in_query(per_page()),
        Operation::get(
            "get_risk",
            "/organizations/{org_id}/risk-assessments/{risk_id}",
        )
        .describe(
            "Get detailed risk assessment including likelihood, impact scores (inherent and \
             residual), treatment plan, owner, and review date.",
        )
        .in_path(org_id())
        .in_path(Param::string("risk_id").describe("Risk assessment ID")),
        Operation::post("create_risk", "/organizations/{org_id}/risk-assessments")
            .describe(
                "Create a new risk assessment in the risk register. Requires likelihood and \
                 impact scores for the 5x5 risk matrix.",
            )
            .in_path(org_id())
            .in_body(Param::string("title").describe("Risk title"))
            .in_body(Param::string("description").describe("Risk description"))
            .in_body(
                Param::integer("likelihood")
                    .range(RISK_SCORE_MIN, RISK_SCORE_MAX)
                    .describe("Inherent likelihood (1-5)"),
            )
            .in_body(
                Param::integer("impact")
                    .range(RISK_SCORE_MIN, RISK_SCORE_MAX)
                    .describe("Inherent impact (1-5)"),
            )
            .in_body(Param::string("owner").optional().describe("Risk owner"))
            .in_body(Param::string("treatment_status").optional().describe(
                "Treatment status (e.g., 'mitigate', 'accept', 'transfer', 'avoid')",
            ))
            .in_body(
                Param::string("control_id")
                    .optional()
                    .describe("Linked control ID"),
            ),
        Operation::get("get_risk_matrix", "/organizations/{org_id}/risk-matrix")
            .describe(
                "Get the 5x5 risk matrix visualization data for the organization. Shows risk \
                 distribution across likelihood and impact dimensions.",
            )
            .in_path(org_id()),
        Operation::get("get_risk_summary", "/organizations/{org_id}/risk-summary")
            .describe(
                "Get aggregated risk summary for the organization: total risks by severity, \
                 treatment status breakdown, and trend data.",
            )
            .in_path(org_id()),
    ]
}
