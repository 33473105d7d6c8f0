//! Operation tables, one module per business domain.

pub mod capabilities;
pub mod catalog;
pub mod evidence;
pub mod organization;
pub mod risk;
pub mod scoped_controls;
pub mod vendors;

use crate::constants::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::services::operation::{Operation, Param};
use once_cell::sync::Lazy;
use std::collections::HashMap;

const ORG_ID_DESCRIPTION: &str = "Organization ID (UUID) from list_organizations";

static OPERATIONS: Lazy<Vec<Operation>> = Lazy::new(|| {
    let mut operations = Vec::new();
    operations.extend(catalog::operations());
    operations.extend(scoped_controls::operations());
    operations.extend(evidence::operations());
    operations.extend(risk::operations());
    operations.extend(vendors::operations());
    operations.extend(organization::operations());
    operations.extend(capabilities::operations());
    operations
});

static OPERATION_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    OPERATIONS
        .iter()
        .enumerate()
        .map(|(idx, operation)| (operation.name, idx))
        .collect()
});

pub fn operations() -> &'static [Operation] {
    &OPERATIONS
}

pub fn operation_by_name(name: &str) -> Option<&'static Operation> {
    OPERATION_INDEX.get(name).map(|idx| &OPERATIONS[*idx])
}

pub(crate) fn org_id() -> Param {
    Param::string("org_id").describe(ORG_ID_DESCRIPTION)
}

pub(crate) fn limit(default: i64) -> Param {
    Param::integer("limit")
        .range(1, MAX_PAGE_SIZE)
        .default(default)
        .describe("Number of results to return (max 100)")
}

pub(crate) fn offset() -> Param {
    Param::integer("offset")
        .min(0)
        .default(0)
        .describe("Number of results to skip for pagination")
}

pub(crate) fn page() -> Param {
    Param::integer("page")
        .min(1)
        .default(1)
        .describe("Page number")
}

pub(crate) fn per_page() -> Param {
    Param::integer("per_page")
        .range(1, MAX_PAGE_SIZE)
        .default(DEFAULT_PAGE_SIZE)
        .describe("Results per page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::operation::{template_placeholders, Binding, ParamKind, ToolArgs};
    use serde_json::{json, Map, Value};
    use std::collections::HashSet;

    fn sample_value(param: &Param) -> Value {
        match &param.kind {
            ParamKind::String if param.binding == Binding::Path => {
                json!(format!("{}-value", param.name))
            }
            ParamKind::String => json!("text"),
            ParamKind::Integer { min, .. } => json!(min.unwrap_or(1)),
            ParamKind::Boolean => json!(true),
            ParamKind::Enum(values) => json!(values[0]),
            ParamKind::Objects { fields, .. } => {
                let item: Map<String, Value> = fields
                    .iter()
                    .filter(|field| field.is_required())
                    .map(|field| (field.name.to_string(), sample_value(field)))
                    .collect();
                json!([item])
            }
        }
    }

    fn required_args(operation: &Operation) -> ToolArgs {
        let raw: Map<String, Value> = operation
            .params
            .iter()
            .filter(|param| param.is_required())
            .map(|param| (param.name.to_string(), sample_value(param)))
            .collect();
        operation
            .prepare_args(&Value::Object(raw))
            .expect("sample args")
    }

    #[test]
    fn operation_names_are_unique() {
        let names: HashSet<&str> = operations().iter().map(|op| op.name).collect();
        assert_eq!(names.len(), operations().len());
        assert_eq!(operations().len(), 39);
    }

    #[test]
    fn path_placeholders_match_path_params() {
        for operation in operations().iter().filter(|op| !op.has_custom_route()) {
            let placeholders: HashSet<&str> =
                template_placeholders(operation.path).into_iter().collect();
            let path_params: HashSet<&str> = operation
                .params
                .iter()
                .filter(|param| param.binding == Binding::Path)
                .map(|param| param.name)
                .collect();
            assert_eq!(placeholders, path_params, "{}", operation.name);
        }
    }

    #[test]
    fn every_path_identifier_appears_exactly_once() {
        for operation in operations() {
            let args = required_args(operation);
            let request = operation.build_request(&args).expect(operation.name);
            for param in operation
                .params
                .iter()
                .filter(|param| param.binding == Binding::Path && param.is_required())
            {
                let value = format!("{}-value", param.name);
                assert_eq!(
                    request.path.matches(&value).count(),
                    1,
                    "{} path {}",
                    operation.name,
                    request.path
                );
            }
        }
    }

    #[test]
    fn omitted_optionals_never_reach_the_wire() {
        for operation in operations() {
            let args = required_args(operation);
            let request = operation.build_request(&args).expect(operation.name);
            let body = request
                .body
                .as_ref()
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            for param in operation
                .params
                .iter()
                .filter(|param| !param.required && param.default.is_none())
            {
                assert!(
                    request.query_value(param.name).is_none(),
                    "{} leaked {} into query",
                    operation.name,
                    param.name
                );
                assert!(
                    !body.contains_key(param.name),
                    "{} leaked {} into body",
                    operation.name,
                    param.name
                );
            }
        }
    }

    #[test]
    fn read_operations_never_carry_a_body() {
        for operation in operations()
            .iter()
            .filter(|op| op.method == reqwest::Method::GET)
        {
            assert!(!operation.has_body(), "{}", operation.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        let operation = operation_by_name("get_control").expect("get_control");
        assert!(operation.is_composite());
        assert!(operation_by_name("get_controls").is_none());
    }
}
