use crate::constants::api::PATH_PREFIX;
use crate::errors::{ApiError, ToolError};
use crate::services::config::ClientConfig;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use url::Url;

/// One backend call: method, path below `/api`, query pairs and an optional
/// JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Appends a query pair; null values are dropped rather than encoded.
    pub fn with_query_value(mut self, key: &str, value: &Value) -> Self {
        if let Some(rendered) = render_query_value(value) {
            self.query.push((key.to_string(), rendered));
        }
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

pub fn render_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError>;
}

/// Authenticated JSON client for the SCF platform API.
#[derive(Clone)]
pub struct ScfApiClient {
    config: ClientConfig,
    http: Client,
}

impl ScfApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ToolError> {
        let http = Client::builder()
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let raw = format!("{}{}{}", self.config.base_url(), PATH_PREFIX, request.path);
        let mut url = Url::parse(&raw)
            .map_err(|err| ApiError::Transport(format!("Invalid request URL {}: {}", raw, err)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, path: &str, query: &[(&str, Value)]) -> Result<Value, ApiError> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |request, (key, value)| {
                request.with_query_value(key, value)
            });
        self.send(&request).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send(&with_optional_body(ApiRequest::new(Method::POST, path), body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send(&with_optional_body(ApiRequest::new(Method::PATCH, path), body))
            .await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send(&with_optional_body(ApiRequest::new(Method::PUT, path), body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(&ApiRequest::new(Method::DELETE, path)).await
    }
}

#[async_trait]
impl ApiTransport for ScfApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(request)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(self.config.api_key())
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| {
            ApiError::Transport(format!(
                "Malformed JSON response from {} {}: {}",
                request.method, request.path, err
            ))
        })
    }
}

fn with_optional_body(request: ApiRequest, body: Option<Value>) -> ApiRequest {
    match body {
        Some(body) => request.with_body(body),
        None => request,
    }
}

fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let detail = parsed.as_ref().and_then(|value| {
        detail_text(value.get("detail")).or_else(|| detail_text(value.get("error")))
    });
    let code = parsed
        .as_ref()
        .and_then(|value| value.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string);
    ApiError::Status {
        status: status.as_u16(),
        message: detail.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string()
        }),
        code,
    }
}

fn detail_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Null | Value::Bool(false) | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
