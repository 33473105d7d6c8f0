use crate::constants::limits::{MAX_SCHEMA_ERRORS, MAX_SUGGESTIONS};
use crate::errors::ToolError;
use crate::managers;
use crate::utils::suggest::closest_names;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    managers::operations()
        .iter()
        .map(|operation| ToolDef {
            name: operation.name.to_string(),
            description: operation.description.to_string(),
            input_schema: operation.input_schema(),
        })
        .collect()
});

static TOOL_MAP: Lazy<HashMap<&'static str, &'static ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .map(|tool| (tool.name.as_str(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, Result<JSONSchema, String>>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .map(|tool| {
            let compiled =
                JSONSchema::compile(&tool.input_schema).map_err(|err| err.to_string());
            (tool.name.clone(), compiled)
        })
        .collect()
});

pub fn tool_catalog() -> &'static [ToolDef] {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name).copied()
}

/// Tools as advertised by `tools/list`.
pub fn list_tools() -> Vec<ToolDef> {
    TOOL_CATALOG.clone()
}

/// Tools whose generated schema failed to compile, with the compiler message.
pub fn schema_failures() -> Vec<(String, String)> {
    let mut failures: Vec<(String, String)> = TOOL_VALIDATORS
        .iter()
        .filter_map(|(name, compiled)| {
            compiled
                .as_ref()
                .err()
                .map(|err| (name.clone(), err.clone()))
        })
        .collect();
    failures.sort();
    failures
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let Some(tool) = tool_by_name(tool_name) else {
        return Err(unknown_tool(tool_name));
    };
    let schema = match TOOL_VALIDATORS.get(tool_name) {
        Some(Ok(schema)) => schema,
        Some(Err(err)) => {
            return Err(ToolError::internal(format!(
                "Input schema for {} does not compile: {}",
                tool_name, err
            )))
        }
        None => {
            return Err(ToolError::internal(format!(
                "No input schema registered for {}",
                tool_name
            )))
        }
    };
    if let Err(errors) = schema.validate(args) {
        return Err(format_schema_errors(tool_name, args, errors, &tool.input_schema));
    }
    Ok(())
}

pub fn unknown_tool(tool_name: &str) -> ToolError {
    let names = TOOL_CATALOG.iter().map(|tool| tool.name.as_str());
    let suggestions = closest_names(tool_name, names, MAX_SUGGESTIONS);
    let mut message = format!("Unknown tool: {}", tool_name);
    if !suggestions.is_empty() {
        message.push_str(&format!(". Did you mean: {}?", suggestions.join(", ")));
    }
    ToolError::invalid_params(message)
        .with_hint("Call tools/list for the available tools")
        .with_details(serde_json::json!({ "tool": tool_name, "did_you_mean": suggestions }))
}

fn format_schema_errors(
    tool_name: &str,
    args: &Value,
    errors: jsonschema::ErrorIterator,
    schema: &Value,
) -> ToolError {
    let mut rendered = Vec::new();
    let mut did_you_means = Vec::new();

    for err in errors.take(MAX_SCHEMA_ERRORS) {
        let instance_path = err.instance_path.to_string();
        let field = field_label(&instance_path);
        match &err.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let known = schema_node(schema, &parent_path(&err.schema_path.to_string()))
                    .and_then(|node| node.get("properties"))
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().collect::<Vec<_>>())
                    .unwrap_or_default();
                for unknown in unexpected {
                    let name = nested_label(&instance_path, unknown);
                    rendered.push(format!("{}: unknown field", name));
                    let suggestions =
                        closest_names(unknown, known.iter().map(String::as_str), MAX_SUGGESTIONS);
                    if !suggestions.is_empty() {
                        did_you_means.push(format!("{} -> {}", name, suggestions.join(", ")));
                    }
                }
            }
            ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                rendered.push(format!(
                    "{}: missing required field",
                    nested_label(&instance_path, &prop)
                ));
            }
            ValidationErrorKind::Enum { options } => {
                let allowed: Vec<String> = options
                    .as_array()
                    .map(|values| {
                        values
                            .iter()
                            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();
                rendered.push(format!("{}: expected one of {}", field, allowed.join(", ")));
                let received = value_at(args, &instance_path);
                if let Some(received) = received.and_then(Value::as_str) {
                    let suggestions = closest_names(
                        received,
                        allowed.iter().map(String::as_str),
                        MAX_SUGGESTIONS,
                    );
                    if !suggestions.is_empty() {
                        did_you_means.push(format!("{} -> {}", field, suggestions.join(", ")));
                    }
                }
            }
            ValidationErrorKind::Type { kind } => {
                rendered.push(format!("{}: expected {}", field, format_type_kind(kind)));
            }
            ValidationErrorKind::Minimum { limit } => {
                rendered.push(format!("{}: must be >= {}", field, limit));
            }
            ValidationErrorKind::Maximum { limit } => {
                rendered.push(format!("{}: must be <= {}", field, limit));
            }
            ValidationErrorKind::MinLength { .. } => {
                rendered.push(format!("{}: must not be empty", field));
            }
            ValidationErrorKind::Pattern { .. } => {
                rendered.push(format!(
                    "{}: must be a single path segment (not '.' or '..', without '/', '?', '#' or '\\')",
                    field
                ));
            }
            ValidationErrorKind::MinItems { limit } => {
                rendered.push(format!("{}: must contain at least {} item(s)", field, limit));
            }
            ValidationErrorKind::MaxItems { limit } => {
                rendered.push(format!("{}: must contain at most {} items", field, limit));
            }
            _ => {
                rendered.push(format!("{}: {}", field, err));
            }
        }
    }

    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    lines.extend(rendered.iter().map(|line| format!("- {}", line)));
    if !did_you_means.is_empty() {
        lines.push(format!("Did you mean: {}", did_you_means.join(" | ")));
    }
    ToolError::invalid_params(lines.join("\n"))
        .with_hint(format!("See the inputSchema of {} in tools/list", tool_name))
        .with_details(serde_json::json!({
            "tool": tool_name,
            "errors": rendered,
            "did_you_mean": did_you_means,
        }))
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

/// `/operations/0/owner` reads as `operations[0].owner`.
fn field_label(instance_path: &str) -> String {
    let mut label = String::new();
    for segment in instance_path.split('/').filter(|s| !s.is_empty()) {
        if segment.parse::<usize>().is_ok() {
            label.push_str(&format!("[{}]", segment));
        } else {
            if !label.is_empty() {
                label.push('.');
            }
            label.push_str(segment);
        }
    }
    if label.is_empty() {
        "arguments".to_string()
    } else {
        label
    }
}

fn nested_label(instance_path: &str, name: &str) -> String {
    if instance_path.trim_matches('/').is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", field_label(instance_path), name)
    }
}

fn parent_path(schema_path: &str) -> String {
    match schema_path.rfind('/') {
        Some(idx) => schema_path[..idx].to_string(),
        None => String::new(),
    }
}

fn schema_node<'a>(schema: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = schema;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn value_at<'a>(root: &'a Value, instance_path: &str) -> Option<&'a Value> {
    schema_node(root, instance_path)
}
