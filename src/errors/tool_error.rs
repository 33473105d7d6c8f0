use crate::constants::api::ENV_API_KEY;
use crate::errors::ApiError;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Config,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    QuotaExceeded,
    Remote,
    Transport,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            status: None,
            hint: None,
            details: None,
            retryable: matches!(kind, ToolErrorKind::RateLimited | ToolErrorKind::Transport),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Config, "CONFIGURATION", message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Transport, "TRANSPORT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    /// Maps a backend status and its extracted detail onto the fixed message
    /// templates callers rely on.
    pub fn from_status(status: u16, detail: &str) -> Self {
        let error = match status {
            401 => Self::new(
                ToolErrorKind::Unauthorized,
                "UNAUTHORIZED",
                format!("Authentication failed. Check your {}.", ENV_API_KEY),
            ),
            402 => Self::new(
                ToolErrorKind::QuotaExceeded,
                "QUOTA_EXCEEDED",
                "Subscription limit reached. Upgrade your plan to continue.",
            ),
            403 => Self::new(
                ToolErrorKind::Forbidden,
                "FORBIDDEN",
                "Access denied. Your API key may lack permissions for this operation.",
            ),
            404 => Self::new(
                ToolErrorKind::NotFound,
                "NOT_FOUND",
                format!("Not found: {}", detail),
            ),
            429 => Self::new(
                ToolErrorKind::RateLimited,
                "RATE_LIMITED",
                "Rate limited. Please wait before retrying.",
            ),
            _ => Self::new(
                ToolErrorKind::Remote,
                "API_ERROR",
                format!("API error ({}): {}", status, detail),
            ),
        };
        error.with_status(status)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status {
                status,
                message,
                code,
            } => {
                let mut mapped = ToolError::from_status(status, &message);
                if let Some(code) = code {
                    mapped = mapped.with_details(serde_json::json!({
                        "remote_code": code,
                        "remote_detail": message,
                    }));
                }
                mapped
            }
            ApiError::Transport(message) => ToolError::transport(message),
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}
