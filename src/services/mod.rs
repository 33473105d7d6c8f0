pub mod api_client;
pub mod config;
pub mod logger;
pub mod operation;
pub mod tool_executor;
