use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::{unknown_tool, validate_tool_args};
use crate::mcp::envelope::Envelope;
use crate::services::api_client::{ApiRequest, ApiTransport, ScfApiClient};
use crate::services::config::ClientConfig;
use crate::services::logger::Logger;
use crate::services::operation::{Operation, ToolArgs};
use futures::future::join_all;
use futures::FutureExt;
use once_cell::sync::OnceCell;
use serde_json::{json, Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Runs named operations against the backend.
///
/// The transport is built from the environment on first use and kept for the
/// life of the executor, so a missing credential only fails the calls that
/// need it.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    transport: Arc<OnceCell<Arc<dyn ApiTransport>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("executor"),
            transport: Arc::new(OnceCell::new()),
        }
    }

    pub fn with_transport(logger: Logger, transport: Arc<dyn ApiTransport>) -> Self {
        let executor = Self::new(logger);
        let _ = executor.transport.set(transport);
        executor
    }

    fn transport(&self) -> Result<&Arc<dyn ApiTransport>, ToolError> {
        self.transport.get_or_try_init(|| {
            let config = ClientConfig::from_env()?;
            self.logger.debug(
                "api client initialized",
                Some(&json!({ "base_url": config.base_url() })),
            );
            let client = ScfApiClient::new(config)?;
            Ok(Arc::new(client) as Arc<dyn ApiTransport>)
        })
    }

    /// Validates, maps and sends one call. Validation and configuration
    /// failures return before any request is issued.
    pub async fn execute(&self, name: &str, raw_args: Value) -> Result<Value, ToolError> {
        let operation = managers::operation_by_name(name).ok_or_else(|| unknown_tool(name))?;
        let raw_args = if raw_args.is_null() {
            Value::Object(Map::new())
        } else {
            raw_args
        };
        validate_tool_args(name, &raw_args)?;
        let args = operation.prepare_args(&raw_args)?;
        let transport = self.transport()?;
        let request = operation.build_request(&args)?;

        if operation.is_composite() {
            return self
                .fetch_composite(transport.as_ref(), operation, &request, &args)
                .await;
        }
        Ok(transport.send(&request).await?)
    }

    /// Primary and related fetches run concurrently. A failed related fetch
    /// degrades to an empty list; a failed primary fails the call.
    async fn fetch_composite(
        &self,
        transport: &dyn ApiTransport,
        operation: &Operation,
        primary: &ApiRequest,
        args: &ToolArgs,
    ) -> Result<Value, ToolError> {
        let related = operation.related_requests(args)?;
        let related_fetches = related.iter().map(|(key, request)| async move {
            match transport.send(request).await {
                Ok(value) => value,
                Err(err) => {
                    self.logger.warn(
                        "related fetch failed, using empty list",
                        Some(&json!({
                            "tool": operation.name,
                            "related": key,
                            "path": request.path,
                            "error": err.to_string(),
                        })),
                    );
                    Value::Array(Vec::new())
                }
            }
        });

        let (primary_result, related_values) =
            tokio::join!(transport.send(primary), join_all(related_fetches));

        let mut out = Map::new();
        out.insert(operation.primary_key.to_string(), primary_result?);
        for ((key, _), value) in related.iter().zip(related_values) {
            out.insert((*key).to_string(), value);
        }
        Ok(Value::Object(out))
    }

    /// Runs a call to completion and folds every outcome, panics included,
    /// into an [`Envelope`].
    pub async fn call(&self, name: &str, args: Value) -> Envelope {
        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "tool call started",
            Some(&json!({ "tool": name, "call_id": call_id })),
        );

        let result = match AssertUnwindSafe(self.execute(name, args))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => Err(ToolError::internal(format!(
                "Tool {} failed unexpectedly: {}",
                name,
                panic_message(panic.as_ref())
            ))),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.info(
                "tool call succeeded",
                Some(&json!({ "tool": name, "call_id": call_id, "duration_ms": duration_ms })),
            ),
            Err(err) => self.logger.warn(
                "tool call failed",
                Some(&json!({
                    "tool": name,
                    "call_id": call_id,
                    "duration_ms": duration_ms,
                    "code": err.code,
                    "status": err.status,
                })),
            ),
        }
        Envelope::from_result(result)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        return (*text).to_string();
    }
    if let Some(text) = panic.downcast_ref::<String>() {
        return text.clone();
    }
    "panic".to_string()
}
