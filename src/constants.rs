pub mod api {
    pub const DEFAULT_BASE_URL: &str = "https://eu.scfcontrolsplatform.app";
    pub const PATH_PREFIX: &str = "/api";
    pub const ENV_API_KEY: &str = "SCF_API_KEY";
    pub const ENV_API_URL: &str = "SCF_API_URL";
    pub const API_KEY_SETTINGS_URL: &str = "https://eu.scfcontrolsplatform.app/settings/api-keys";
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const SERVER_NAME: &str = "mcp-server-scf";
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

pub mod limits {
    pub const MAX_PAGE_SIZE: i64 = 100;
    pub const DEFAULT_PAGE_SIZE: i64 = 25;
    pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 50;
    pub const MAX_BATCH_OPERATIONS: usize = 500;
    pub const RISK_SCORE_MIN: i64 = 1;
    pub const RISK_SCORE_MAX: i64 = 5;
    pub const MAX_SCHEMA_ERRORS: usize = 10;
    pub const MAX_SUGGESTIONS: usize = 3;
}

pub mod logging {
    pub const ENV_LOG_LEVEL: &str = "SCF_LOG_LEVEL";
    pub const ENV_LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}
