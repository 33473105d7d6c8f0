use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::{schema_failures, tool_catalog};
use crate::services::api_client::ApiTransport;
use crate::services::logger::Logger;
use crate::services::operation::{template_placeholders, Binding};
use crate::services::tool_executor::ToolExecutor;
use std::collections::HashSet;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// Checks that the operation table is internally consistent: unique
    /// names, one path parameter per placeholder, compilable schemas.
    fn validate_tool_wiring() -> Result<(), ToolError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for operation in managers::operations() {
            if !seen.insert(operation.name) {
                problems.push(format!("{}: duplicate tool name", operation.name));
            }
            if operation.has_custom_route() {
                continue;
            }
            let declared: HashSet<&str> = operation
                .params
                .iter()
                .filter(|param| param.binding == Binding::Path)
                .map(|param| param.name)
                .collect();
            let placeholders: HashSet<&str> =
                template_placeholders(operation.path).into_iter().collect();
            for missing in placeholders.difference(&declared) {
                problems.push(format!(
                    "{}: placeholder {{{}}} has no path parameter",
                    operation.name, missing
                ));
            }
            for unused in declared.difference(&placeholders) {
                problems.push(format!(
                    "{}: path parameter {} is not in {}",
                    operation.name, unused, operation.path
                ));
            }
        }
        for (name, err) in schema_failures() {
            problems.push(format!("{}: input schema does not compile: {}", name, err));
        }
        if tool_catalog().len() != managers::operations().len() {
            problems.push("tool catalog and operation table differ in size".to_string());
        }
        if problems.is_empty() {
            return Ok(());
        }
        problems.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every operation needs a unique name and matching path parameters")
            .with_details(serde_json::json!({ "problems": problems })))
    }

    pub fn initialize() -> Result<Self, ToolError> {
        let logger = Logger::new("scf");
        Self::validate_tool_wiring()?;
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone()));
        logger.debug(
            "operation table loaded",
            Some(&serde_json::json!({ "tools": tool_catalog().len() })),
        );
        Ok(Self {
            logger,
            tool_executor,
        })
    }

    /// Same wiring as [`App::initialize`] with a caller-supplied backend.
    pub fn with_transport(transport: Arc<dyn ApiTransport>) -> Result<Self, ToolError> {
        let logger = Logger::new("scf");
        Self::validate_tool_wiring()?;
        let tool_executor = Arc::new(ToolExecutor::with_transport(logger.clone(), transport));
        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
