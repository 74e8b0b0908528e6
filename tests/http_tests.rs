//! HTTP endpoint integration tests.
//!
//! Drives the router directly over an in-memory store:
//! - `/createUser` - create-if-absent
//! - `/getUser` - fetch by query or path
//! - `/updateUser` - whole-record update
//! - `/fetchUsers` - sorted best-effort listing
//! - `/health` - store liveness

// Import TestApp from the common module (sibling file)
#[path = "common.rs"]
mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::TestApp;
use scoreboard::config::ServerConfig;
use scoreboard::store::{KvBackend, KvStore};
use serde_json::{Value, json};
use std::time::Duration;

// =============================================================================
// Create Tests
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_new_record() {
    let app = TestApp::new();

    let resp = app.create("alice").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "User created successfully");
    assert_eq!(resp.body["user"], json!({ "username": "alice", "matchesWon": 0 }));
}

#[tokio::test]
async fn test_create_user_twice_reports_existing() {
    let app = TestApp::new();
    app.create("alice").await;
    app.update("alice", "4").await;

    let resp = app.create("alice").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "User already exists");
    assert_eq!(resp.body["user"]["matchesWon"], 4);
}

#[tokio::test]
async fn test_create_user_missing_username() {
    let app = TestApp::new();

    let resp = app.json(Method::POST, "/createUser", json!({})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "username is required");

    let resp = app.create("").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_non_string_username() {
    let app = TestApp::new();

    let resp = app
        .json(Method::POST, "/createUser", json!({ "username": 42 }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].is_string());
}

#[tokio::test]
async fn test_create_user_malformed_json() {
    let app = TestApp::new();

    let resp = app
        .send(
            Request::post("/createUser")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": "))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_stores_structured_json() {
    let app = TestApp::new();
    let name = r#"eve", "matchesWon": 1000"#;

    let resp = app.create(name).await;
    assert_eq!(resp.status, StatusCode::OK);

    let stored = app.store.get(name).await.unwrap().unwrap();
    let value: Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(value["username"], name);
    assert_eq!(value["matchesWon"], 0);
}

// =============================================================================
// Get Tests
// =============================================================================

#[tokio::test]
async fn test_get_user_by_query() {
    let app = TestApp::new();
    app.create("bob").await;

    let resp = app.get("/getUser?username=bob").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "User details");
    assert_eq!(resp.body["user"], json!({ "username": "bob", "matchesWon": 0 }));
}

#[tokio::test]
async fn test_get_user_by_path() {
    let app = TestApp::new();
    app.create("bob").await;

    let resp = app.get("/getUser/bob").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["username"], "bob");
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = TestApp::new();

    let resp = app.get("/getUser?username=nobody").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"], "user not found");
}

#[tokio::test]
async fn test_get_user_missing_query() {
    let app = TestApp::new();

    let resp = app.get("/getUser").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_malformed_stored_value() {
    let app = TestApp::new();
    app.store.set("broken", b"not a record").await.unwrap();

    let resp = app.get("/getUser/broken").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Update Tests
// =============================================================================

#[tokio::test]
async fn test_update_user_then_get() {
    let app = TestApp::new();
    app.create("carol").await;

    let resp = app.update("carol", "5").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "message": "User updated successfully" }));

    let resp = app.get("/getUser?username=carol").await;
    assert_eq!(resp.body["user"]["matchesWon"], 5);
}

#[tokio::test]
async fn test_update_user_negative_value() {
    let app = TestApp::new();
    app.create("carol").await;

    assert_eq!(app.update("carol", "-3").await.status, StatusCode::OK);
    let resp = app.get("/getUser/carol").await;
    assert_eq!(resp.body["user"]["matchesWon"], -3);
}

#[tokio::test]
async fn test_update_user_accepts_integer_json() {
    let app = TestApp::new();
    app.create("dave").await;

    let resp = app
        .json(
            Method::PUT,
            "/updateUser",
            json!({ "username": "dave", "matchesWon": 9 }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get("/getUser/dave").await.body["user"]["matchesWon"], 9);
}

#[tokio::test]
async fn test_update_user_invalid_value() {
    let app = TestApp::new();
    app.create("dave").await;
    app.update("dave", "2").await;

    let resp = app.update("dave", "abc").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "invalid matchesWon value");

    let resp = app.get("/getUser/dave").await;
    assert_eq!(resp.body["user"]["matchesWon"], 2);
}

#[tokio::test]
async fn test_update_user_rejects_non_integer_json() {
    let app = TestApp::new();
    app.create("dave").await;

    for value in [json!(2.5), json!(1e20), json!(u64::MAX), json!(true)] {
        let resp = app
            .json(
                Method::PUT,
                "/updateUser",
                json!({ "username": "dave", "matchesWon": value }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{value}");
        assert_eq!(resp.body["error"], "invalid matchesWon value");
    }
    assert_eq!(app.get("/getUser/dave").await.body["user"]["matchesWon"], 0);
}

#[tokio::test]
async fn test_update_user_missing_fields() {
    let app = TestApp::new();

    let resp = app
        .json(Method::PUT, "/updateUser", json!({ "username": "dave" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "username and matchesWon are required");

    let resp = app
        .json(Method::PUT, "/updateUser", json!({ "matchesWon": "1" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_not_found() {
    let app = TestApp::new();

    let resp = app.update("ghost", "1").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(app.store.get("ghost").await.unwrap().is_none());
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_users_sorted() {
    let app = TestApp::new();
    for name in ["bob", "alice", "carol"] {
        app.create(name).await;
    }
    app.update("bob", "3").await;

    let resp = app.get("/fetchUsers").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "List of all users");

    let data = resp.body["data"].as_array().unwrap();
    let names: Vec<_> = data.iter().map(|e| e["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    // userData is the record encoded as JSON text
    let bob: Value = serde_json::from_str(data[1]["userData"].as_str().unwrap()).unwrap();
    assert_eq!(bob, json!({ "username": "bob", "matchesWon": 3 }));
    assert_eq!(resp.body["skipped"], 0);
}

#[tokio::test]
async fn test_fetch_users_empty() {
    let app = TestApp::new();

    let resp = app.get("/fetchUsers").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"], json!([]));
}

#[tokio::test]
async fn test_fetch_users_skips_foreign_keys() {
    let app = TestApp::new();
    app.create("alice").await;
    app.store.set("cache:token", b"opaque").await.unwrap();

    let resp = app.get("/fetchUsers").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(resp.body["skipped"], 1);
}

#[tokio::test]
async fn test_prefix_keeps_foreign_keys_out_of_listing() {
    let app = TestApp::with_prefix("player:");
    app.store.set("cache:token", b"opaque").await.unwrap();
    app.create("alice").await;

    assert!(app.store.get("player:alice").await.unwrap().is_some());

    let resp = app.get("/fetchUsers").await;
    assert_eq!(resp.body["data"][0]["username"], "alice");
    assert_eq!(resp.body["skipped"], 0);
}

// =============================================================================
// Health, Routing and Failure Tests
// =============================================================================

#[tokio::test]
async fn test_health_ok() {
    let app = TestApp::new();

    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "status": "ok", "store": "up" }));
}

#[tokio::test]
async fn test_closed_store_reports_failures() {
    let app = TestApp::new();
    app.create("alice").await;
    app.store.close().await.unwrap();

    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.body["store"], "down");

    assert_eq!(
        app.get("/getUser/alice").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.get("/fetchUsers").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.create("bob").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

/// Accepts every call and never answers.
struct HangingBackend;

#[async_trait::async_trait]
impl KvBackend for HangingBackend {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> anyhow::Result<()> {
        std::future::pending().await
    }

    async fn list(&self, _prefix: &str) -> anyhow::Result<Vec<String>> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_slow_request_times_out_with_408() {
    let store = KvStore::custom(HangingBackend).with_timeout(Duration::from_secs(60));
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let app = TestApp::with_store(store, "", &server);

    let resp = app.get("/getUser/alice").await;
    assert_eq!(resp.status, StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_wrong_method_rejected() {
    let app = TestApp::new();

    let resp = app
        .send(Request::delete("/createUser").body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_metrics_disabled_by_default() {
    let app = TestApp::new();
    assert_eq!(app.get("/metrics").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_rendered_when_enabled() {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use scoreboard::http::{AppState, router};
    use scoreboard::record::RecordService;

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let records = RecordService::new(KvStore::memory(), "");
    let app = router(
        AppState::new(records).with_metrics(handle),
        &ServerConfig::default(),
    );

    let resp = tower::ServiceExt::oneshot(
        app,
        Request::get("/metrics").body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = TestApp::new();

    let resp = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/updateUser")
                .header(header::ORIGIN, "http://localhost:8000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(resp.status.is_success());
    assert_eq!(
        resp.headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
