use axum::http::StatusCode;
use axum::body::Body;
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use gradewatch::api::{build_router, create_app_state, AppState};
use gradewatch::pipeline::OrchestratorConfig;
use gradewatch::poller::ScriptedService;
use std::sync::Arc;

const READY_BAD: &str = r#"{"status":"READY","endpoints":[{"grade":"A"},{"grade":"T"}]}"#;

fn create_test_state() -> (AppState, Arc<ScriptedService>) {
    let service = Arc::new(ScriptedService::new());
    let state = create_app_state(OrchestratorConfig::default(), service.clone());
    (state, service)
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

async fn navigate(state: &AppState, session: u64, url: &str, kind: &str) -> Value {
    let req = make_request("POST", "/api/navigation", Some(json!({
        "session": session,
        "url": url,
        "kind": kind,
    })));
    let response = app(state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _) = create_test_state();
    let req = make_request("GET", "/api/health", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gradewatch");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    match option_env!("GIT_HASH") {
        Some(hash) => assert_eq!(body["git_hash"], hash),
        None => assert!(body.get("git_hash").is_none()),
    }
}

#[tokio::test]
async fn test_navigation_scans_and_publishes_grade() {
    let (state, service) = create_test_state();
    service.push_body("a.com", READY_BAD);

    let body = navigate(&state, 7, "https://a.com/index.html", "main_frame").await;
    assert_eq!(body["outcome"], "scan_started");
    assert_eq!(body["hostname"], "a.com");
    state.orchestrator.drain().await;

    let req = make_request("GET", "/api/sessions/7", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["primary"], "a.com");
    assert_eq!(body["hostnames"], json!(["a.com"]));
    assert_eq!(body["status"]["text"], "T");
    assert_eq!(body["status"]["color"], "#FF462C");

    // Second tab on the same host is answered from the cache
    let body = navigate(&state, 8, "https://a.com/other", "main_frame").await;
    assert_eq!(body["outcome"], "cached");
    assert_eq!(body["grade"], "T");
    assert_eq!(body["tier"], "bad");
    assert_eq!(service.calls("a.com"), 1);
}

#[tokio::test]
async fn test_bare_hostname_ignored() {
    let (state, service) = create_test_state();

    let body = navigate(&state, 1, "http://localhost:3000/", "main_frame").await;
    assert_eq!(body["outcome"], "ignored");
    assert!(body["hostname"].is_null());
    assert_eq!(service.total_calls(), 0);

    let req = make_request("GET", "/api/sessions/1", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (state, _) = create_test_state();

    for (method, uri) in [
        ("GET", "/api/sessions/99"),
        ("DELETE", "/api/sessions/99"),
        ("POST", "/api/sessions/99/report"),
    ] {
        let req = make_request(method, uri, None);
        let response = app(&state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("99"));
    }
}

#[tokio::test]
async fn test_report_lists_views_primary_first() {
    let (state, _) = create_test_state();

    let req = make_request("PUT", "/api/preferences", Some(json!({
        "auto": false,
        "depth": "js",
        "publish": false,
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    navigate(&state, 3, "https://api.b.com/data", "xmlhttprequest").await;
    navigate(&state, 3, "https://a.com/", "main_frame").await;
    navigate(&state, 3, "https://img.c.com/logo.png", "image").await;

    let req = make_request("POST", "/api/sessions/3/report", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    let views = body["views"].as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["hostname"], "a.com");
    assert_eq!(views[0]["placement"], "current_tab");
    assert_eq!(views[0]["delay_ms"], 0);
    assert_eq!(
        views[0]["url"],
        "https://www.ssllabs.com/ssltest/analyze.html?d=a.com&hideResults=on"
    );
    assert_eq!(views[1]["hostname"], "api.b.com");
    assert_eq!(views[1]["placement"], "new_tab");
    assert_eq!(views[1]["delay_ms"], 1000);
}

#[tokio::test]
async fn test_preferences_round_trip_and_depth_change() {
    let (state, _) = create_test_state();

    let req = make_request("GET", "/api/preferences", None);
    let response = app(&state).oneshot(req).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["auto"], true);
    assert_eq!(body["maxAge"], 72);
    assert_eq!(body["depth"], "doc");

    let req = make_request("PUT", "/api/preferences", Some(json!({"depth": "all", "maxAge": 12})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["depth_changed"], true);
    assert_eq!(body["preferences"]["maxAge"], 12);

    let req = make_request("PUT", "/api/preferences", Some(json!({"maxAge": 0})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session() {
    let (state, _) = create_test_state();
    state.orchestrator.update_preferences(gradewatch::config::Preferences {
        auto: false,
        ..Default::default()
    }).await.unwrap();
    navigate(&state, 5, "https://a.com/", "main_frame").await;

    let req = make_request("DELETE", "/api/sessions/5", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["deleted"], true);

    let req = make_request("GET", "/api/sessions/5", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_listing() {
    let (state, service) = create_test_state();
    service.push_body("a.com", READY_BAD);
    navigate(&state, 1, "https://a.com/", "main_frame").await;
    state.orchestrator.drain().await;

    let req = make_request("GET", "/api/cache", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["target"], "a.com");
    assert_eq!(body["in_flight"], json!([]));
}
