use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use eve_wiki_mcp::server::rate_limit::RateLimiter;
use eve_wiki_mcp::server::state::AppState;
use eve_wiki_mcp::server::build_router;
use eve_wiki_mcp::tools::ToolRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::FakeWiki;

fn router(auth_token: Option<&str>, max_requests: usize) -> Router {
    let state = AppState::with_rate_limiter(
        Arc::new(ToolRegistry::new()),
        Arc::new(FakeWiki::new()),
        auth_token.map(str::to_string),
        RateLimiter::new(max_requests, Duration::from_secs(60)),
    );
    build_router(Arc::new(state), &[])
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_service_and_version() {
    let response = router(None, 60)
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "eve-university-wiki-mcp");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_auth_required_when_token_set() {
    let app = router(Some("secret-token"), 60);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/tools", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");

    let response = app
        .clone()
        .oneshot(request("GET", "/api/tools", Some("wrong"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/tools", Some("secret-token"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health stays open
    let response = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let app = router(None, 1);
    let addr: SocketAddr = "10.0.0.7:40000".parse().unwrap();

    let mut first = request("GET", "/api/tools", None, None);
    first.extensions_mut().insert(ConnectInfo(addr));
    let response = app.clone().oneshot(first).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut second = request("GET", "/api/tools", None, None);
    second.extensions_mut().insert(ConnectInfo(addr));
    let response = app.clone().oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json_body(response).await["error"],
        "Rate limit exceeded. Please try again later."
    );

    // A different client has its own window
    let mut other = request("GET", "/api/tools", None, None);
    other
        .extensions_mut()
        .insert(ConnectInfo("10.0.0.8:40000".parse::<SocketAddr>().unwrap()));
    let response = app.oneshot(other).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_bypasses_rate_limit() {
    let response = router(None, 0)
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_and_call_tools() {
    let app = router(None, 60);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/tools", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"get_related_pages"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/tools/search_eve_wiki",
            None,
            Some(json!({"query": "venture"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tool"], "search_eve_wiki");
    assert_eq!(body["is_error"], false);
    assert!(body["content"]
        .as_str()
        .unwrap()
        .starts_with("# Search Results for 'venture'"));

    let response = app
        .clone()
        .oneshot(request("POST", "/api/tools/search_eve_wiki", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["is_error"], true);
    assert_eq!(body["content"], "❌ query must be a string");

    let response = app
        .oneshot(request("POST", "/api/tools/warp_drive", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = router(None, 60);

    let bad = Request::builder()
        .method("POST")
        .uri("/api/tools/generate_newbro_mining_plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"hours_per_session": 2.0,"#))
        .unwrap();
    let response = app.clone().oneshot(bad).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));

    // Whitespace only still means "no arguments"
    let blank = Request::builder()
        .method("POST")
        .uri("/api/tools/search_eve_wiki")
        .body(Body::from("  \n"))
        .unwrap();
    let response = app.oneshot(blank).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["content"], "❌ query must be a string");
}
