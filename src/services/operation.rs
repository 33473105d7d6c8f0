//! Declarative description of a backend operation exposed as a tool.
//!
//! An [`Operation`] lists its parameters in order, says where each one goes
//! (path, query or body) and produces an [`ApiRequest`] from validated
//! arguments. The JSON Schema advertised to callers is generated from the same
//! descriptors.

use crate::errors::ToolError;
use crate::services::api_client::ApiRequest;
use reqwest::Method;
use serde_json::{json, Map, Value};

/// Path parameters must stay one segment: no separators, no query or
/// fragment, nothing the URL parser strips, and no dot segments.
const PATH_SEGMENT_PATTERN: &str = r"^(?!(?:\.|%2[eE]){1,2}$)[^/?#\\\t\n\r]+$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone)]
pub enum ParamKind {
    String,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Boolean,
    Enum(&'static [&'static str]),
    Objects {
        fields: Vec<Param>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub binding: Binding,
}

impl Param {
    fn new(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            description: "",
            kind,
            required: true,
            default: None,
            binding: Binding::Query,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(
            name,
            ParamKind::Integer {
                min: None,
                max: None,
            },
        )
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, ParamKind::Enum(values))
    }

    pub fn objects(name: &'static str, fields: Vec<Param>) -> Self {
        Self::new(
            name,
            ParamKind::Objects {
                fields,
                min_items: None,
                max_items: None,
            },
        )
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn min(mut self, value: i64) -> Self {
        if let ParamKind::Integer { min, .. } = &mut self.kind {
            *min = Some(value);
        }
        self
    }

    pub fn range(mut self, lower: i64, upper: i64) -> Self {
        if let ParamKind::Integer { min, max } = &mut self.kind {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    pub fn items(mut self, lower: usize, upper: usize) -> Self {
        if let ParamKind::Objects {
            min_items,
            max_items,
            ..
        } = &mut self.kind
        {
            *min_items = Some(lower);
            *max_items = Some(upper);
        }
        self
    }

    /// Required from the caller's point of view: a default makes it optional.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    pub fn schema(&self) -> Value {
        let mut schema = match &self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Integer { min, max } => {
                let mut schema = json!({ "type": "integer" });
                if let Some(min) = min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::Enum(values) => json!({ "type": "string", "enum": values }),
            ParamKind::Objects {
                fields,
                min_items,
                max_items,
            } => {
                let mut schema = json!({ "type": "array", "items": object_schema(fields) });
                if let Some(min) = min_items {
                    schema["minItems"] = json!(min);
                }
                if let Some(max) = max_items {
                    schema["maxItems"] = json!(max);
                }
                schema
            }
        };
        if self.binding == Binding::Path {
            schema["minLength"] = json!(1);
            schema["pattern"] = json!(PATH_SEGMENT_PATTERN);
        }
        if !self.description.is_empty() {
            schema["description"] = json!(self.description);
        }
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

/// Closed object schema for an ordered parameter list.
pub fn object_schema(params: &[Param]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in params {
        properties.insert(param.name.to_string(), param.schema());
        if param.is_required() {
            required.push(Value::String(param.name.to_string()));
        }
    }
    let mut schema = json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Validated arguments with declared defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn path_value(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ToolArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A sub-resource fetched alongside the primary resource of a composite read.
#[derive(Debug, Clone)]
pub struct RelatedFetch {
    pub key: &'static str,
    pub path: &'static str,
}

pub type RouteFn = fn(&Operation, &ToolArgs) -> Result<ApiRequest, ToolError>;

#[derive(Clone)]
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub params: Vec<Param>,
    pub related: Vec<RelatedFetch>,
    pub primary_key: &'static str,
    route: Option<RouteFn>,
}

impl Operation {
    pub fn new(method: Method, name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            description: "",
            method,
            path,
            params: Vec::new(),
            related: Vec::new(),
            primary_key: "data",
            route: None,
        }
    }

    pub fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(Method::GET, name, path)
    }

    pub fn post(name: &'static str, path: &'static str) -> Self {
        Self::new(Method::POST, name, path)
    }

    pub fn patch(name: &'static str, path: &'static str) -> Self {
        Self::new(Method::PATCH, name, path)
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn in_path(self, param: Param) -> Self {
        self.bind(param, Binding::Path)
    }

    pub fn in_query(self, param: Param) -> Self {
        self.bind(param, Binding::Query)
    }

    pub fn in_body(self, param: Param) -> Self {
        self.bind(param, Binding::Body)
    }

    fn bind(mut self, mut param: Param, binding: Binding) -> Self {
        param.binding = binding;
        self.params.push(param);
        self
    }

    /// Turns the operation into a composite read: `path` is fetched next to
    /// the primary resource and lands under `key`.
    pub fn related(mut self, key: &'static str, path: &'static str) -> Self {
        self.related.push(RelatedFetch { key, path });
        self
    }

    pub fn primary_as(mut self, key: &'static str) -> Self {
        self.primary_key = key;
        self
    }

    /// Replaces the default template mapping for operations whose path
    /// depends on which arguments are present.
    pub fn route_with(mut self, route: RouteFn) -> Self {
        self.route = Some(route);
        self
    }

    pub fn has_custom_route(&self) -> bool {
        self.route.is_some()
    }

    pub fn is_composite(&self) -> bool {
        !self.related.is_empty()
    }

    pub fn has_body(&self) -> bool {
        self.params.iter().any(|param| param.binding == Binding::Body)
    }

    pub fn input_schema(&self) -> Value {
        object_schema(&self.params)
    }

    /// Normalizes raw call arguments and applies declared defaults. Shape
    /// validation happens before this, against [`Operation::input_schema`].
    pub fn prepare_args(&self, raw: &Value) -> Result<ToolArgs, ToolError> {
        let mut map = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(ToolError::invalid_params(format!(
                    "Arguments for {} must be an object, got {}",
                    self.name,
                    value_type_name(other)
                )))
            }
        };
        for param in &self.params {
            if let Some(default) = &param.default {
                if !map.contains_key(param.name) {
                    map.insert(param.name.to_string(), default.clone());
                }
            }
            if let Some(value) = map.get_mut(param.name) {
                normalize_integers(param, value);
            }
        }
        Ok(ToolArgs(map))
    }

    pub fn build_request(&self, args: &ToolArgs) -> Result<ApiRequest, ToolError> {
        match self.route {
            Some(route) => route(self, args),
            None => Ok(self.request_at(render_path(self.path, args)?, args)),
        }
    }

    /// Builds the request for an already-rendered path. Query and body
    /// parameters the caller omitted are left out entirely.
    pub fn request_at(&self, path: String, args: &ToolArgs) -> ApiRequest {
        let mut request = ApiRequest::new(self.method.clone(), path);
        let mut body = Map::new();
        for param in &self.params {
            let Some(value) = args.get(param.name) else {
                continue;
            };
            match param.binding {
                Binding::Path => {}
                Binding::Query => request = request.with_query_value(param.name, value),
                Binding::Body => {
                    body.insert(param.name.to_string(), value.clone());
                }
            }
        }
        if self.has_body() {
            request = request.with_body(Value::Object(body));
        }
        request
    }

    pub fn related_requests(
        &self,
        args: &ToolArgs,
    ) -> Result<Vec<(&'static str, ApiRequest)>, ToolError> {
        self.related
            .iter()
            .map(|related| Ok((related.key, ApiRequest::get(render_path(related.path, args)?))))
            .collect()
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("related", &self.related)
            .field("custom_route", &self.route.is_some())
            .finish()
    }
}

pub fn template_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        names.push(&after[..end]);
        rest = &after[end + 1..];
    }
    names
}

/// Substitutes `{name}` placeholders with argument values, verbatim.
pub fn render_path(template: &str, args: &ToolArgs) -> Result<String, ToolError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            ToolError::internal(format!("Unterminated placeholder in path {}", template))
        })?;
        let name = &after[..end];
        let value = args.path_value(name).ok_or_else(|| {
            ToolError::invalid_params(format!("{}: missing required path parameter", name))
        })?;
        check_path_segment(name, &value)?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Rejects values the URL parser would split, drop or resolve away, so the
/// identifier reaches the backend as exactly one segment.
fn check_path_segment(name: &str, value: &str) -> Result<(), ToolError> {
    let splits = value
        .chars()
        .any(|ch| matches!(ch, '/' | '?' | '#' | '\\' | '\t' | '\n' | '\r'));
    let decoded = value.to_ascii_lowercase().replace("%2e", ".");
    if value.is_empty() || splits || decoded == "." || decoded == ".." {
        return Err(ToolError::invalid_params(format!(
            "{}: must be a single path segment (not '.' or '..', without '/', '?', '#' or '\\')",
            name
        )));
    }
    Ok(())
}

/// JSON Schema accepts `25.0` as an integer; send it as `25`.
fn normalize_integers(param: &Param, value: &mut Value) {
    match &param.kind {
        ParamKind::Integer { .. } => {
            if let Some(whole) = whole_number(value) {
                *value = Value::from(whole);
            }
        }
        ParamKind::Objects { fields, .. } => {
            let Value::Array(items) = value else {
                return;
            };
            for item in items.iter_mut().filter_map(Value::as_object_mut) {
                for field in fields {
                    if let Some(value) = item.get_mut(field.name) {
                        normalize_integers(field, value);
                    }
                }
            }
        }
        _ => {}
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if number.is_i64() || number.is_u64() {
        return None;
    }
    let float = number.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
