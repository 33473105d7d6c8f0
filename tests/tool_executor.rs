mod common;
use common::{restore_env, MockBackend, ENV_LOCK};

use scf_mcp::app::App;
use scf_mcp::errors::ToolErrorKind;
use serde_json::json;

#[tokio::test]
async fn get_control_survives_missing_assessment_objectives() {
    let backend = MockBackend::start(&[
        (
            "GET",
            "/api/catalog/controls/AST-01",
            200,
            r#"{"scf_id":"AST-01","title":"Asset Governance"}"#,
        ),
        (
            "GET",
            "/api/catalog/controls/AST-01/assessment-objectives",
            404,
            r#"{"detail":"none"}"#,
        ),
        (
            "GET",
            "/api/catalog/controls/AST-01/evidence",
            200,
            r#"[{"id":"E-AST-01"}]"#,
        ),
    ])
    .await;

    let envelope = backend
        .app()
        .tool_executor
        .call("get_control", json!({"scf_id": "AST-01"}))
        .await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());
    let payload = envelope.payload().expect("payload");
    assert_eq!(payload["control"]["title"], json!("Asset Governance"));
    assert_eq!(payload["assessment_objectives"], json!([]));
    assert_eq!(payload["evidence_items"], json!([{"id": "E-AST-01"}]));

    let mut paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "/api/catalog/controls/AST-01",
            "/api/catalog/controls/AST-01/assessment-objectives",
            "/api/catalog/controls/AST-01/evidence",
        ]
    );
}

#[tokio::test]
async fn get_control_fails_when_the_control_is_missing() {
    let backend = MockBackend::start(&[
        (
            "GET",
            "/api/catalog/controls/NOPE-01",
            404,
            r#"{"detail":"Control NOPE-01 not found"}"#,
        ),
        (
            "GET",
            "/api/catalog/controls/NOPE-01/evidence",
            200,
            "[]",
        ),
    ])
    .await;

    let envelope = backend
        .app()
        .tool_executor
        .call("get_control", json!({"scf_id": "NOPE-01"}))
        .await;
    let err = envelope.error().expect("error envelope");
    assert_eq!(err.kind, ToolErrorKind::NotFound);
    assert_eq!(envelope.render_text(), "Not found: Control NOPE-01 not found");
}

#[tokio::test]
async fn page_size_out_of_range_sends_nothing() {
    let backend = MockBackend::start(&[]).await;
    let app = backend.app();

    for per_page in [0, 101] {
        let envelope = app
            .tool_executor
            .call(
                "list_scoped_controls",
                json!({"org_id": "org-1", "per_page": per_page}),
            )
            .await;
        let err = envelope.error().expect("validation error");
        assert_eq!(err.code, "INVALID_PARAMS");
        assert!(err.message.contains("per_page"), "{}", err.message);
    }
    let envelope = app
        .tool_executor
        .call("list_controls", json!({"limit": 500}))
        .await;
    assert!(envelope.is_error());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn defaults_are_sent_and_absent_optionals_are_not() {
    let backend = MockBackend::start(&[
        ("GET", "/api/catalog/controls", 200, r#"{"items":[]}"#),
        (
            "PATCH",
            "/api/organizations/org-1/scoped-controls/sc-42",
            200,
            r#"{"id":"sc-42"}"#,
        ),
        ("GET", "/api/notifications", 200, "[]"),
    ])
    .await;
    let app = backend.app();

    let envelope = app
        .tool_executor
        .call("list_controls", json!({"domain": "AST"}))
        .await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());

    let envelope = app
        .tool_executor
        .call(
            "update_scoped_control",
            json!({
                "org_id": "org-1",
                "scoped_control_id": "sc-42",
                "implementation_status": "IMPLEMENTED",
            }),
        )
        .await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());

    let envelope = app.tool_executor.call("get_notifications", json!({})).await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[0].query.as_deref(),
        Some("domain=AST&limit=25&offset=0")
    );
    assert_eq!(requests[1].method, "PATCH");
    assert_eq!(
        requests[1].json_body(),
        json!({"implementation_status": "IMPLEMENTED"})
    );
    assert_eq!(
        requests[2].query.as_deref(),
        Some("unread_only=false&limit=25")
    );
}

#[tokio::test]
async fn status_codes_map_to_fixed_messages() {
    let backend = MockBackend::start(&[
        ("GET", "/api/organizations/o-401", 401, r#"{"detail":"bad token"}"#),
        ("GET", "/api/organizations/o-402", 402, r#"{"detail":"plan"}"#),
        ("GET", "/api/organizations/o-403", 403, r#"{"detail":"role"}"#),
        ("GET", "/api/organizations/o-404", 404, r#"{"detail":"Organization not found"}"#),
        ("GET", "/api/organizations/o-429", 429, r#"{"detail":"slow"}"#),
        ("GET", "/api/organizations/o-500", 500, r#"{"error":"database unavailable"}"#),
    ])
    .await;
    let app = backend.app();

    let cases = [
        ("o-401", "Authentication failed. Check your SCF_API_KEY.", "UNAUTHORIZED"),
        (
            "o-402",
            "Subscription limit reached. Upgrade your plan to continue.",
            "QUOTA_EXCEEDED",
        ),
        (
            "o-403",
            "Access denied. Your API key may lack permissions for this operation.",
            "FORBIDDEN",
        ),
        ("o-404", "Not found: Organization not found", "NOT_FOUND"),
        ("o-429", "Rate limited. Please wait before retrying.", "RATE_LIMITED"),
        ("o-500", "API error (500): database unavailable", "API_ERROR"),
    ];
    for (org_id, message, code) in cases {
        let envelope = app
            .tool_executor
            .call("get_organization", json!({ "org_id": org_id }))
            .await;
        let err = envelope.error().expect("error");
        assert_eq!(envelope.render_text(), message);
        assert_eq!(err.code, code);
    }
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let _guard = ENV_LOCK.lock().await;
    let prev_key = std::env::var("SCF_API_KEY").ok();
    std::env::remove_var("SCF_API_KEY");

    let app = App::initialize().expect("startup does not need the key");
    let envelope = app
        .tool_executor
        .call("list_organizations", json!({}))
        .await;
    let err = envelope.error().expect("config error");
    assert_eq!(err.kind, ToolErrorKind::Config);
    assert!(err.message.contains("SCF_API_KEY"));

    let envelope = app
        .tool_executor
        .call("get_risk", json!({"org_id": "org-1"}))
        .await;
    assert_eq!(
        envelope.error().expect("validation error").kind,
        ToolErrorKind::InvalidParams
    );

    restore_env("SCF_API_KEY", prev_key);
}

#[tokio::test]
async fn environment_selects_backend_and_credential() {
    let _guard = ENV_LOCK.lock().await;
    let backend = MockBackend::start(&[("GET", "/api/users/me", 200, r#"{"email":"a@b.c"}"#)]).await;
    let prev_key = std::env::var("SCF_API_KEY").ok();
    let prev_url = std::env::var("SCF_API_URL").ok();
    std::env::set_var("SCF_API_KEY", "env-key");
    std::env::set_var("SCF_API_URL", format!("{}/", backend.base_url));

    let app = App::initialize().expect("app");
    let envelope = app.tool_executor.call("get_current_user", json!({})).await;

    restore_env("SCF_API_KEY", prev_key);
    restore_env("SCF_API_URL", prev_url);

    assert!(!envelope.is_error(), "{}", envelope.render_text());
    let requests = backend.requests();
    assert_eq!(requests[0].path, "/api/users/me");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer env-key"));
}

#[tokio::test]
async fn dot_segment_identifiers_never_reach_the_backend() {
    let backend = MockBackend::start(&[]).await;
    let app = backend.app();

    let calls = [
        ("update_system", json!({"org_id": "org-1", "system_id": "..", "name": "x"})),
        ("get_vendor", json!({"org_id": "..", "vendor_id": ".."})),
        ("get_organization", json!({"org_id": "%2e%2e"})),
        ("get_organization", json!({"org_id": "a\\b"})),
        ("list_assessment_objectives", json!({"control_id": "."})),
    ];
    for (tool, args) in calls {
        let envelope = app.tool_executor.call(tool, args).await;
        let err = envelope.error().expect("rejected");
        assert_eq!(err.kind, ToolErrorKind::InvalidParams, "{}", tool);
        assert!(err.message.contains("single path segment"), "{}", err.message);
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn whole_number_floats_go_out_as_integers() {
    let backend = MockBackend::start(&[
        ("GET", "/api/catalog/controls", 200, r#"{"items":[]}"#),
        (
            "POST",
            "/api/organizations/org-1/risk-assessments",
            201,
            r#"{"id":"risk-1"}"#,
        ),
    ])
    .await;
    let app = backend.app();

    let envelope = app
        .tool_executor
        .call("list_controls", json!({"limit": 25.0, "offset": 50.0}))
        .await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());

    let envelope = app
        .tool_executor
        .call(
            "create_risk",
            json!({
                "org_id": "org-1",
                "title": "Backup gap",
                "description": "Nightly backups untested",
                "likelihood": 3.0,
                "impact": 4,
            }),
        )
        .await;
    assert!(!envelope.is_error(), "{}", envelope.render_text());

    let requests = backend.requests();
    assert_eq!(requests[0].query.as_deref(), Some("limit=25&offset=50"));
    let body = requests[1].json_body();
    assert_eq!(body["likelihood"], json!(3));
    assert!(body["likelihood"].is_i64());
}
