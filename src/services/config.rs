use crate::constants::api::{API_KEY_SETTINGS_URL, DEFAULT_BASE_URL, ENV_API_KEY, ENV_API_URL};
use crate::errors::ToolError;
use std::fmt;

/// Base URL and credential for the backend. Immutable once built.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ToolError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_api_key());
        }
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ToolError::config(format!(
                "{} must not be empty",
                ENV_API_URL
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            api_key,
        })
    }

    /// Reads `SCF_API_KEY` and `SCF_API_URL`. An empty URL falls back to the
    /// default; an empty key is treated as absent.
    pub fn from_env() -> Result<Self, ToolError> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(missing_api_key)?;
        let base_url = std::env::var(ENV_API_URL)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

fn missing_api_key() -> ToolError {
    ToolError::config(format!(
        "{} environment variable is required. Generate one at {}",
        ENV_API_KEY, API_KEY_SETTINGS_URL
    ))
    .with_hint(format!("Set {} in the MCP server environment", ENV_API_KEY))
}
