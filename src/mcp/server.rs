use crate::app::App;
use crate::constants::server::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::managers;
use crate::mcp::catalog::{list_tools, unknown_tool};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new() -> Result<Self, ToolError> {
        let app = App::initialize()?;
        Ok(Self::with_app(app))
    }

    pub fn with_app(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    fn handle_tools_list(&self) -> Value {
        json!({ "tools": list_tools() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            return Err(McpError::invalid_params("Missing tool name"));
        }
        if managers::operation_by_name(name).is_none() {
            return Err(McpError::invalid_params(unknown_tool(name).message));
        }
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);
        let envelope = self.app.tool_executor.call(name, args).await;
        Ok(envelope.to_call_result())
    }

    /// Answers one request. Notifications yield `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                self.app.logger.debug(
                    "ignoring request without id",
                    Some(&json!({ "method": request.method })),
                );
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            method if method.starts_with("notifications/") => Ok(json!({})),
            method => Err(McpError::method_not_found(method)),
        };
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::from_error(id, err),
        })
    }

    pub async fn run_stdio(self: Arc<Self>) -> Result<(), ToolError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer = tokio::spawn(async move {
            let mut out = BufWriter::new(tokio::io::stdout());
            while let Some(response) = rx.recv().await {
                let payload = serde_json::to_string(&response).unwrap_or_default();
                out.write_all(payload.as_bytes()).await?;
                out.write_all(b"\n").await?;
                out.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        self.app.logger.info("SCF MCP Server running on stdio", None);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let request = match parse_request(trimmed) {
                Ok(request) => request,
                Err(response) => {
                    let _ = tx.send(response);
                    continue;
                }
            };
            if request.method == "tools/call" && !request.is_notification() {
                let server = Arc::clone(&self);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = server.handle_request(request).await {
                        let _ = tx.send(response);
                    }
                });
                continue;
            }
            if let Some(response) = self.handle_request(request).await {
                let _ = tx.send(response);
            }
        }

        drop(tx);
        writer
            .await
            .map_err(|err| ToolError::internal(format!("stdout writer stopped: {}", err)))??;
        Ok(())
    }
}

/// Decodes one input line, or produces the protocol error to send back.
pub fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let parsed: Value = serde_json::from_str(line).map_err(|_| {
        JsonRpcResponse::from_error(
            Value::Null,
            McpError::new(ErrorCode::ParseError, "Parse error"),
        )
    })?;
    let id = parsed.get("id").cloned().unwrap_or(Value::Null);
    let invalid = |id: Value| {
        JsonRpcResponse::from_error(
            id,
            McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
        )
    };
    let request: JsonRpcRequest = serde_json::from_value(parsed).map_err(|_| invalid(id.clone()))?;
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(invalid(id));
    }
    Ok(request)
}

pub async fn run_stdio() -> Result<(), ToolError> {
    let server = Arc::new(McpServer::new()?);
    server.run_stdio().await
}
