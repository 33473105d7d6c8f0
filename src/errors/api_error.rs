use thiserror::Error;

/// Outcome of a failed backend call, before it is mapped into the tool error
/// taxonomy.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
    },
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport("HTTP request timed out".to_string());
        }
        Self::Transport(err.to_string())
    }
}
