#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use once_cell::sync::Lazy;
use scf_mcp::app::App;
use scf_mcp::services::api_client::ScfApiClient;
use scf_mcp::services::config::ClientConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TEST_API_KEY: &str = "scf_test_key";

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<(String, String), (u16, String)>>,
    seen: Arc<StdMutex<Vec<Recorded>>>,
}

async fn record_and_reply(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().expect("lock").push(Recorded {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_text(header::AUTHORIZATION),
        accept: header_text(header::ACCEPT),
        content_type: header_text(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let key = (method.as_str().to_string(), uri.path().to_string());
    match state.routes.get(&key) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).expect("status"),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"detail":"no mock route"}"#.to_string(),
        )
            .into_response(),
    }
}

/// In-process stand-in for the SCF platform. Routes are keyed by method and
/// full path (including the `/api` prefix); anything else answers 404.
pub struct MockBackend {
    pub base_url: String,
    seen: Arc<StdMutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockBackend {
    pub async fn start(routes: &[(&str, &str, u16, &str)]) -> Self {
        let routes: HashMap<(String, String), (u16, String)> = routes
            .iter()
            .map(|(method, path, status, body)| {
                (
                    (method.to_string(), path.to_string()),
                    (*status, body.to_string()),
                )
            })
            .collect();
        let state = MockState {
            routes: Arc::new(routes),
            seen: Arc::new(StdMutex::new(Vec::new())),
        };
        let seen = state.seen.clone();

        let app = Router::new().fallback(record_and_reply).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move { server.await });

        Self {
            base_url: format!("http://{addr}"),
            seen,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().expect("lock").clone()
    }

    pub fn client(&self) -> ScfApiClient {
        let config = ClientConfig::new(self.base_url.clone(), TEST_API_KEY).expect("config");
        ScfApiClient::new(config).expect("client")
    }

    /// App wired to this backend without touching the environment.
    pub fn app(&self) -> App {
        App::with_transport(Arc::new(self.client())).expect("app")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
