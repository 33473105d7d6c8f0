use crate::errors::ToolError;
use serde_json::{json, Value};

/// Outcome of one tool call: the backend payload or a classified error,
/// never both.
#[derive(Debug, Clone)]
pub enum Envelope {
    Success(Value),
    Failure(ToolError),
}

impl Envelope {
    pub fn from_result(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => Envelope::Success(value),
            Err(err) => Envelope::Failure(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Failure(_))
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Envelope::Failure(err) => Some(err),
            Envelope::Success(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Envelope::Success(value) => Some(value),
            Envelope::Failure(_) => None,
        }
    }

    /// Pretty-printed payload on success, the caller-facing message on failure.
    pub fn render_text(&self) -> String {
        match self {
            Envelope::Success(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Envelope::Failure(err) => err.message.clone(),
        }
    }

    /// MCP `tools/call` result body.
    pub fn to_call_result(&self) -> Value {
        let mut result = json!({
            "content": [ { "type": "text", "text": self.render_text() } ],
            "isError": self.is_error(),
        });
        if let Envelope::Failure(err) = self {
            result["structuredContent"] = json!({ "error": err });
        }
        result
    }
}
